// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::pin::Pin;

use tb_core::{Tile, TileSet};

use crate::drive::StoreFuture;

/// Remote persistence for the board.
///
/// The sync engine only ever talks to this trait, so tests can drive it
/// with an in-memory store and a paused clock.
pub trait TileStore: Send + Sync + 'static {
    /// Reads the stored snapshot. `Ok(None)` means nothing usable exists yet.
    fn load(&self) -> StoreFuture<'_, Option<Vec<Tile>>>;

    /// Replaces the stored snapshot.
    fn save<'a>(&'a self, tiles: &'a TileSet) -> StoreFuture<'a, ()>;

    /// Stores an encoded thumbnail and returns its file id.
    fn upload_thumbnail<'a>(&'a self, name: &'a str, bytes: Vec<u8>, mime: &'a str) -> StoreFuture<'a, String>;

    fn download_thumbnail<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, Vec<u8>>;

    /// Removes a thumbnail. Failures are logged, never returned.
    fn delete_thumbnail<'a>(&'a self, file_id: &'a str) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}
