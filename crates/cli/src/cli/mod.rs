// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use crate::colors;
use crate::help;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tb_core::TileId;

/// Parse a tile letter, case-insensitively.
fn parse_tile_id(s: &str) -> Result<TileId, String> {
    s.parse::<TileId>()
        .map_err(|_| format!("'{s}' is not a tile letter (A-Z)"))
}

/// Parse `YYYY-MM-DD` or the literal `today`.
fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    if s.trim().eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    tb_core::tile::parse_date(s).map_err(|_| format!("'{s}' is not a date (use YYYY-MM-DD or today)"))
}

/// Parse a token lifetime in seconds.
fn parse_lifetime(s: &str) -> Result<i64, String> {
    match s.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err("must be a positive number of seconds".to_string()),
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "tileboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An A-Z board of notes, dates and thumbnails, synced to your drive")]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Log sync and request detail to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show all tiles
    List {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one tile in full
    Show {
        /// Tile letter (A-Z)
        #[arg(value_parser = parse_tile_id)]
        id: TileId,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Change a tile's note or date
    #[command(after_help = colors::examples("\
Examples:
  tileboard edit c --note \"Cat\"           Replace the note on tile C
  tileboard edit c --date 2026-03-01      Set and enable a date
  tileboard edit c --date today           Use today's date
  tileboard edit c --no-date              Turn the date off"))]
    Edit {
        /// Tile letter (A-Z)
        #[arg(value_parser = parse_tile_id)]
        id: TileId,

        /// New note text (empty clears it)
        #[arg(long, short = 'n')]
        note: Option<String>,

        /// Date as YYYY-MM-DD or "today"; enables the date
        #[arg(long, short = 'd', value_parser = parse_date_arg, conflicts_with = "no_date")]
        date: Option<NaiveDate>,

        /// Turn the date on without changing it
        #[arg(long, conflicts_with = "no_date")]
        enable_date: bool,

        /// Turn the date off and clear it
        #[arg(long)]
        no_date: bool,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Manage tile thumbnails
    #[command(subcommand)]
    Thumb(ThumbCommand),

    /// Show sync state and any pending local copy
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Push the board, or resolve a pending local copy
    #[command(after_help = colors::examples("\
Examples:
  tileboard sync                  Write the current board now
  tileboard sync --adopt          Replace the board with the local copy
  tileboard sync --discard        Drop the local copy"))]
    Sync {
        /// Replace the remote board with the pending local copy
        #[arg(long, conflicts_with = "discard")]
        adopt: bool,

        /// Delete the pending local copy
        #[arg(long)]
        discard: bool,
    },

    /// Manage the drive session
    #[command(subcommand)]
    Auth(AuthCommand),
}

#[derive(Subcommand)]
pub enum ThumbCommand {
    /// Attach an image to a tile
    Set {
        #[arg(value_parser = parse_tile_id)]
        id: TileId,

        /// JPEG, PNG, GIF or WebP file, up to 10 MB
        path: PathBuf,
    },

    /// Remove a tile's thumbnail
    Clear {
        #[arg(value_parser = parse_tile_id)]
        id: TileId,
    },

    /// Write a tile's thumbnail to a file
    Get {
        #[arg(value_parser = parse_tile_id)]
        id: TileId,

        /// Destination path
        #[arg(long, short = 'O')]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Sign in with an access token
    Login {
        /// Token to store; prompts when omitted
        #[arg(long)]
        token: Option<String>,

        /// Token lifetime in seconds
        #[arg(long, default_value = "3600", value_parser = parse_lifetime)]
        expires_in: i64,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is active
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
