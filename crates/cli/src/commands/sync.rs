// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::error::{Error, Result};
use crate::sync::{SaveStatus, SyncEngine, TileStore};

use super::{load, persist, Session};

/// What `tileboard sync` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Write the current board.
    Push,
    /// Replace the board with the pending local copy.
    Adopt,
    /// Delete the pending local copy.
    Discard,
}

impl SyncMode {
    pub fn from_flags(adopt: bool, discard: bool) -> Self {
        if adopt {
            SyncMode::Adopt
        } else if discard {
            SyncMode::Discard
        } else {
            SyncMode::Push
        }
    }
}

pub async fn run(session: &Session, mode: SyncMode) -> Result<()> {
    let engine = session.engine()?;
    if mode != SyncMode::Discard {
        load(&engine).await?;
    }
    run_impl(&engine, mode, &mut std::io::stdout().lock()).await
}

pub(crate) async fn run_impl<S: TileStore>(
    engine: &SyncEngine<S>,
    mode: SyncMode,
    out: &mut impl Write,
) -> Result<()> {
    match mode {
        SyncMode::Push => {
            persist(engine).await?;
            writeln!(out, "Board saved")?;
        }
        SyncMode::Adopt => {
            if !engine.adopt_pending().await? {
                return Err(Error::NoPendingChanges);
            }
            let state = engine.state();
            if state.save_status == SaveStatus::Error {
                let reason = state.last_error.unwrap_or_else(|| "unknown error".to_string());
                return Err(Error::SaveFailed(reason));
            }
            writeln!(out, "Local copy saved to the drive")?;
        }
        SyncMode::Discard => {
            if !engine.cache().has() {
                return Err(Error::NoPendingChanges);
            }
            engine.discard_pending();
            writeln!(out, "Discarded local copy")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
