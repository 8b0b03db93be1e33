// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;
use crate::sync::SaveStatus;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Secondary details: medium grey
    pub const CONTEXT: u8 = 245;
    pub const SAVED: u8 = 114;
    pub const SAVING: u8 = 179;
    pub const ERROR: u8 = 167;
}

const RESET: &str = "\x1b[0m";

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Wraps `text` in a 256-color sequence.
pub fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{code}m{text}{RESET}")
}

fn paint_if(code: u8, text: &str) -> String {
    if should_colorize() {
        paint(code, text)
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint_if(codes::HEADER, text)
}

/// Color for a save status, if it gets one.
pub fn status_code(status: SaveStatus) -> Option<u8> {
    match status {
        SaveStatus::Idle => None,
        SaveStatus::Saving => Some(codes::SAVING),
        SaveStatus::Saved => Some(codes::SAVED),
        SaveStatus::Error => Some(codes::ERROR),
    }
}

pub fn status(status: SaveStatus, text: &str) -> String {
    match status_code(status) {
        Some(code) => paint_if(code, text),
        None => text.to_string(),
    }
}

/// Colorize an examples help block: header lines, then `tileboard ...`
/// commands up to the run of spaces before their description.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }

    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];
            if trimmed.ends_with(':') && !trimmed.contains("  ") {
                return format!("{indent}{}", paint(codes::HEADER, trimmed));
            }
            match trimmed.find("  ") {
                Some(end) if trimmed.starts_with("tileboard ") => {
                    let (cmd, desc) = trimmed.split_at(end);
                    format!("{indent}{}{desc}", paint(codes::LITERAL, cmd))
                }
                _ => line.to_string(),
            }
        })
        .collect();
    lines.join("\n")
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
