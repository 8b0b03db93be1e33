// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::cli::OutputFormat;
use crate::display::format_tile_line;
use crate::error::Result;
use crate::sync::{SyncEngine, TileStore};

use super::Session;

pub async fn run(session: &Session, output: OutputFormat) -> Result<()> {
    let engine = session.open_board().await?;
    run_impl(&engine, output, &mut std::io::stdout().lock())
}

pub(crate) fn run_impl<S: TileStore>(
    engine: &SyncEngine<S>,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let tiles = engine.tiles();
    match output {
        OutputFormat::Text => {
            for tile in tiles.iter() {
                writeln!(out, "{}", format_tile_line(tile))?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(tiles.as_slice())?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
