// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local copy of edits that have not reached the remote store.
//!
//! A single `pending.json` holds the most recent unsynced board and when it
//! was written. Writes go to a temporary file which is fsynced and renamed
//! into place, so a crash never leaves a half-written copy.
//!
//! The public API never fails: the cache is a fallback, and a broken cache
//! must not break editing. Problems are logged and a file that does not
//! parse is removed.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::Tile;
use tracing::{debug, warn};

pub const PENDING_FILE_NAME: &str = "pending.json";

/// Error type for cache file access.
#[derive(Debug, thiserror::Error)]
enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

type CacheResult<T> = Result<T, CacheError>;

/// Contents of `pending.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSnapshot {
    pub tiles: Vec<Tile>,
    /// When the copy was written.
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct PendingSnapshotRef<'a> {
    tiles: &'a [Tile],
    timestamp: DateTime<Utc>,
}

/// File-backed pending cache.
#[derive(Debug, Clone)]
pub struct PendingCache {
    path: PathBuf,
}

impl PendingCache {
    /// Cache stored as `pending.json` in `state_dir`.
    pub fn open(state_dir: &Path) -> Self {
        PendingCache::at(state_dir.join(PENDING_FILE_NAME))
    }

    pub fn at(path: PathBuf) -> Self {
        PendingCache { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the cached copy. Returns false if it could not be written.
    pub fn put(&self, tiles: &[Tile]) -> bool {
        match self.write(tiles) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cached pending tiles");
                true
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to cache pending tiles");
                false
            }
        }
    }

    /// The cached tiles, if a readable copy exists.
    pub fn get(&self) -> Option<Vec<Tile>> {
        self.snapshot().map(|s| s.tiles)
    }

    /// The cached copy with its timestamp.
    ///
    /// A file that does not parse is deleted and reported as absent. A file
    /// that cannot be read is left in place.
    pub fn snapshot(&self) -> Option<PendingSnapshot> {
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(e @ CacheError::Serialization(_)) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt pending cache");
                self.clear();
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read pending cache");
                None
            }
        }
    }

    pub fn has(&self) -> bool {
        self.snapshot().is_some()
    }

    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "cleared pending cache"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to clear pending cache"),
        }
    }

    fn read(&self) -> CacheResult<Option<PendingSnapshot>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }

    fn write(&self, tiles: &[Tile]) -> CacheResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let snapshot = PendingSnapshotRef {
            tiles,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&snapshot)?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
