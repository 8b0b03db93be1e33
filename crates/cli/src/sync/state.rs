// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tb_core::TileSet;

/// Progress of the most recent write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    /// A write is scheduled or in flight.
    Saving,
    /// The last write succeeded. Reverts to idle after a short while.
    Saved,
    /// The last write failed.
    Error,
}

impl SaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Error => "error",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable engine state.
///
/// `tiles` is shared: an unchanged board is the same allocation across
/// snapshots, so observers can compare with `Arc::ptr_eq`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncState {
    pub tiles: Arc<TileSet>,
    pub is_initialized: bool,
    pub save_status: SaveStatus,
    /// The remote store could not be reached on the last attempt.
    pub offline: bool,
    /// A local copy holds edits the remote store has not seen.
    pub pending_changes: bool,
    pub last_error: Option<String>,
}
