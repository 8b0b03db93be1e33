// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for command tests.

#![allow(clippy::unwrap_used)]

use tb_core::TileSet;
use tempfile::TempDir;

use crate::cache::PendingCache;
use crate::sync::test_helpers::MockTileStore;
use crate::sync::{EngineConfig, SyncEngine};

pub struct Fixture {
    pub engine: SyncEngine<MockTileStore>,
    pub store: MockTileStore,
    pub dir: TempDir,
}

impl Fixture {
    /// Engine over `store`, not yet initialized.
    pub fn over(store: MockTileStore) -> Self {
        let dir = TempDir::new().unwrap();
        let engine = SyncEngine::new(store.clone(), PendingCache::open(dir.path()), EngineConfig::default());
        Fixture { engine, store, dir }
    }

    /// Engine initialized against a complete blank board.
    pub async fn ready() -> Self {
        let fixture = Fixture::over(MockTileStore::with_remote(TileSet::initial().into_vec()));
        fixture.engine.initialize().await.unwrap();
        fixture
    }
}

/// Captured output as a string.
pub fn text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

/// A blank board missing `letters`.
pub fn board_without(letters: &[char]) -> Vec<tb_core::Tile> {
    TileSet::initial()
        .into_vec()
        .into_iter()
        .filter(|t| !letters.contains(&t.id.as_char()))
        .collect()
}

/// Runs `task` on a fresh single-threaded runtime and drops the runtime
/// afterwards, the way the binary does.
pub fn run_to_exit<T>(task: impl std::future::Future<Output = T>) -> T {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let out = runtime.block_on(task);
    drop(runtime);
    out
}
