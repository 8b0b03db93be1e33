// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use tb_core::TileId;

use crate::cli::OutputFormat;
use crate::colors;
use crate::display::format_tile_detail;
use crate::error::{Error, Result};
use crate::sync::{SyncEngine, TileStore};

use super::Session;

pub async fn run(session: &Session, id: TileId, output: OutputFormat) -> Result<()> {
    let engine = session.open_board().await?;
    run_impl(&engine, id, output, &mut std::io::stdout().lock())
}

pub(crate) fn run_impl<S: TileStore>(
    engine: &SyncEngine<S>,
    id: TileId,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let tile = engine
        .get_tile(id)
        .ok_or_else(|| Error::TileNotFound(id.to_string()))?;
    match output {
        OutputFormat::Text => {
            let mut lines = format_tile_detail(&tile).into_iter();
            if let Some(title) = lines.next() {
                writeln!(out, "{}", colors::header(&title))?;
            }
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&tile)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
