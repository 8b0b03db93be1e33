// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text styling.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let color = |code: u8| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = color(colors::codes::HEADER);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(color(colors::codes::LITERAL))
        .placeholder(color(colors::codes::CONTEXT))
        .valid(color(colors::codes::CONTEXT))
        .error(color(colors::codes::ERROR))
}

/// Examples shown after the top-level help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Examples:
  tileboard auth login             Sign in to the drive
  tileboard list                   Show all 26 tiles
  tileboard edit c --note \"Cat\"    Set the note on tile C
  tileboard edit c --date today    Date tile C with today's date
  tileboard thumb set c cat.jpg    Attach a thumbnail to tile C
  tileboard status                 Check sync state",
    )
}
