// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::{Local, NaiveDate};
use tb_core::{Tile, TileId, TileUpdate};

use crate::cli::OutputFormat;
use crate::display::format_tile_detail;
use crate::error::{Error, Result};
use crate::sync::{SyncEngine, TileStore};

use super::{persist, Session};

/// Requested edits to one tile, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditArgs {
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
    pub enable_date: bool,
    pub no_date: bool,
}

/// Turns edit flags into an update for `tile`.
///
/// `--date` sets the date and turns it on. `--enable-date` keeps an existing
/// date or falls back to `today`. `--no-date` turns it off and clears it.
pub fn build_update(tile: &Tile, args: &EditArgs, today: NaiveDate) -> Result<TileUpdate> {
    let mut update = TileUpdate::new(tile.id);
    if let Some(note) = &args.note {
        update = update.note(note.clone());
    }
    if args.no_date {
        update = update.date_enabled(false).date(None);
    } else if let Some(date) = args.date {
        update = update.date_enabled(true).date(Some(date));
    } else if args.enable_date {
        update = update
            .date_enabled(true)
            .date(Some(tile.date.unwrap_or(today)));
    }
    if update.is_empty() {
        return Err(Error::NothingToChange);
    }
    Ok(update)
}

pub async fn run(session: &Session, id: TileId, args: EditArgs, output: OutputFormat) -> Result<()> {
    let engine = session.open_board().await?;
    run_impl(&engine, id, &args, output, &mut std::io::stdout().lock()).await
}

pub(crate) async fn run_impl<S: TileStore>(
    engine: &SyncEngine<S>,
    id: TileId,
    args: &EditArgs,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let tile = engine
        .get_tile(id)
        .ok_or_else(|| Error::TileNotFound(id.to_string()))?;
    let update = build_update(&tile, args, Local::now().date_naive())?;
    let tiles = engine.update_tile(update)?;
    persist(engine).await?;

    let tile = tiles
        .get(id)
        .ok_or_else(|| Error::TileNotFound(id.to_string()))?;
    match output {
        OutputFormat::Text => {
            for line in format_tile_detail(tile) {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(tile)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "edit_tests.rs"]
mod tests;
