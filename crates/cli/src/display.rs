// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of tiles and sync state.

use chrono::{DateTime, Local, NaiveDate, Utc};
use tb_core::Tile;

use crate::sync::{SaveStatus, SyncState};

/// Width used when wrapping notes in detail views.
pub const NOTE_WIDTH: usize = 72;

/// Longest note preview in list views, in characters.
pub const PREVIEW_CHARS: usize = 48;

/// Formats a calendar date like `Mar 1, 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// First line of a note, cut to `max_chars` with a trailing ellipsis.
pub fn note_preview(note: &str, max_chars: usize) -> String {
    let first = note.lines().next().unwrap_or("").trim();
    let more_lines = note.trim_end().lines().nth(1).is_some();
    if first.chars().count() <= max_chars {
        return if more_lines {
            format!("{first}...")
        } else {
            first.to_string()
        };
    }
    let cut: String = first.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Wrap text at word boundaries, preserving existing newlines.
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') {
        return content.to_string();
    }
    if content.chars().count() <= width {
        return content.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in content.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// One line per tile: letter, date column, note preview and a thumbnail marker.
pub fn format_tile_line(tile: &Tile) -> String {
    let date = tile.effective_date().map(format_date).unwrap_or_default();
    let marker = if tile.thumb_file_id.is_some() { " [img]" } else { "" };
    let line = format!(
        "{}  {:<12}  {}{}",
        tile.id,
        date,
        note_preview(&tile.note, PREVIEW_CHARS),
        marker
    );
    line.trim_end().to_string()
}

/// Full view of a tile.
pub fn format_tile_detail(tile: &Tile) -> Vec<String> {
    let mut lines = vec![format!("Tile {}", tile.id)];

    match tile.effective_date() {
        Some(date) => lines.push(format!("Date: {}", format_date(date))),
        None => lines.push("Date: off".to_string()),
    }
    if let Some(file_id) = &tile.thumb_file_id {
        lines.push(format!("Thumbnail: {file_id}"));
    }
    lines.push(format!("Updated: {}", format_timestamp(tile.updated_at)));

    lines.push(String::new());
    if tile.note.is_empty() {
        lines.push("(no note)".to_string());
    } else {
        for line in wrap_text(&tile.note, NOTE_WIDTH).lines() {
            lines.push(format!("  {line}"));
        }
    }
    lines
}

/// Local-time rendering of an instant.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Human label for a save status.
pub fn status_label(status: SaveStatus) -> &'static str {
    match status {
        SaveStatus::Idle => "up to date",
        SaveStatus::Saving => "saving",
        SaveStatus::Saved => "saved",
        SaveStatus::Error => "save failed",
    }
}

/// Sync summary. `pending_since` is when the local copy was written.
pub fn format_status(state: &SyncState, pending_since: Option<DateTime<Utc>>) -> Vec<String> {
    let mut lines = Vec::new();
    if !state.is_initialized {
        lines.push("Board: not loaded".to_string());
    } else if state.offline {
        lines.push("Board: offline (showing local copy)".to_string());
    } else {
        lines.push("Board: online".to_string());
    }
    lines.push(format!("Save: {}", status_label(state.save_status)));

    if state.pending_changes {
        match pending_since {
            Some(at) => lines.push(format!("Pending: local changes from {}", format_timestamp(at))),
            None => lines.push("Pending: local changes".to_string()),
        }
    }
    if let Some(error) = &state.last_error {
        lines.push(format!("Last error: {error}"));
    }
    lines
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
