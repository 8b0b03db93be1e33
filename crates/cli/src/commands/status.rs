// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::auth::{AccessTokens, NoPrompt};
use crate::cli::OutputFormat;
use crate::colors;
use crate::display::format_status;
use crate::error::Result;
use crate::sync::{SaveStatus, SyncEngine, TileStore};

use super::{load, Session};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    initialized: bool,
    offline: bool,
    save_status: SaveStatus,
    pending_changes: bool,
    pending_since: Option<DateTime<Utc>>,
    last_error: Option<String>,
    signed_in: bool,
    duplicate_folders: usize,
}

/// Reports sync state. A failed load is part of the report, not an error.
pub async fn run(session: &Session, output: OutputFormat) -> Result<()> {
    let signed_in = session.tokens(Box::new(NoPrompt)).get_access_token().is_some();
    let engine = session.engine()?;
    let duplicates = match load(&engine).await {
        Ok(state) if !state.offline => match engine.store().duplicate_folders().await {
            Ok(folders) => folders.len(),
            Err(e) => {
                debug!(error = %e, "failed to list board folders");
                0
            }
        },
        Ok(_) => 0,
        Err(e) => {
            debug!(error = %e, "status without a loaded board");
            0
        }
    };
    run_impl(&engine, signed_in, duplicates, output, &mut std::io::stdout().lock())
}

pub(crate) fn run_impl<S: TileStore>(
    engine: &SyncEngine<S>,
    signed_in: bool,
    duplicate_folders: usize,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let state = engine.state();
    let pending_since = engine.cache().snapshot().map(|s| s.timestamp);
    match output {
        OutputFormat::Text => {
            for line in format_status(&state, pending_since) {
                if line.starts_with("Save: ") {
                    writeln!(out, "{}", colors::status(state.save_status, &line))?;
                } else {
                    writeln!(out, "{line}")?;
                }
            }
            if !signed_in {
                writeln!(out, "Session: signed out (run `tileboard auth login`)")?;
            }
            if duplicate_folders > 1 {
                writeln!(
                    out,
                    "Warning: {duplicate_folders} folders share the board's name, the newest is used"
                )?;
            }
        }
        OutputFormat::Json => {
            let report = StatusReport {
                initialized: state.is_initialized,
                offline: state.offline,
                save_status: state.save_status,
                pending_changes: state.pending_changes,
                pending_since,
                last_error: state.last_error.clone(),
                signed_in,
                duplicate_folders,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
