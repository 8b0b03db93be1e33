// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tb_core::{Tile, TileId, TileSet, TileUpdate};
use tokio::time::Instant;

use super::store::TileStore;
use crate::drive::{DriveError, StoreFuture};

/// One call to [`TileStore::save`].
#[derive(Debug, Clone)]
pub struct SaveRecord {
    /// When the write started.
    pub at: Instant,
    pub tiles: TileSet,
}

#[derive(Default)]
struct MockState {
    remote: Option<Vec<Tile>>,
    loads: usize,
    saves: Vec<SaveRecord>,
    fail_load: bool,
    fail_save: bool,
    fail_upload: bool,
    save_delay: Duration,
    blobs: HashMap<String, (Vec<u8>, String)>,
    next_blob: u64,
    deleted: Vec<String>,
}

/// In-memory [`TileStore`]. Clones share state.
#[derive(Clone, Default)]
pub struct MockTileStore {
    state: Arc<Mutex<MockState>>,
}

fn server_error(what: &str) -> DriveError {
    DriveError::Status {
        status: 500,
        message: format!("Failed to {what}: Internal Server Error"),
    }
}

impl MockTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(tiles: Vec<Tile>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().remote = Some(tiles);
        store
    }

    pub fn remote(&self) -> Option<Vec<Tile>> {
        self.state.lock().unwrap().remote.clone()
    }

    pub fn loads(&self) -> usize {
        self.state.lock().unwrap().loads
    }

    pub fn saves(&self) -> Vec<SaveRecord> {
        self.state.lock().unwrap().saves.clone()
    }

    pub fn fail_load(&self, fail: bool) {
        self.state.lock().unwrap().fail_load = fail;
    }

    pub fn fail_save(&self, fail: bool) {
        self.state.lock().unwrap().fail_save = fail;
    }

    pub fn fail_upload(&self, fail: bool) {
        self.state.lock().unwrap().fail_upload = fail;
    }

    /// Makes every write take `delay` of (virtual) time.
    pub fn save_delay(&self, delay: Duration) {
        self.state.lock().unwrap().save_delay = delay;
    }

    pub fn insert_blob(&self, id: &str, bytes: Vec<u8>, mime: &str) {
        let mut state = self.state.lock().unwrap();
        state.blobs.insert(id.to_string(), (bytes, mime.to_string()));
    }

    pub fn blob(&self, id: &str) -> Option<(Vec<u8>, String)> {
        self.state.lock().unwrap().blobs.get(id).cloned()
    }

    pub fn blob_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut names: Vec<_> = state.blobs.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

impl TileStore for MockTileStore {
    fn load(&self) -> StoreFuture<'_, Option<Vec<Tile>>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.loads += 1;
            if state.fail_load {
                return Err(DriveError::Network("connection refused".to_string()));
            }
            Ok(state.remote.clone())
        })
    }

    fn save<'a>(&'a self, tiles: &'a TileSet) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let delay = {
                let mut state = self.state.lock().unwrap();
                state.saves.push(SaveRecord {
                    at: Instant::now(),
                    tiles: tiles.clone(),
                });
                state.save_delay
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let mut state = self.state.lock().unwrap();
            if state.fail_save {
                return Err(server_error("update file"));
            }
            state.remote = Some(tiles.clone().into_vec());
            Ok(())
        })
    }

    fn upload_thumbnail<'a>(&'a self, name: &'a str, bytes: Vec<u8>, mime: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.fail_upload {
                return Err(server_error("upload blob"));
            }
            state.next_blob += 1;
            let id = format!("blob-{}-{}", state.next_blob, name);
            state.blobs.insert(id.clone(), (bytes, mime.to_string()));
            Ok(id)
        })
    }

    fn download_thumbnail<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let state = self.state.lock().unwrap();
            match state.blobs.get(file_id) {
                Some((bytes, _)) => Ok(bytes.clone()),
                None => Err(DriveError::Status {
                    status: 404,
                    message: "Failed to download file: Not Found".to_string(),
                }),
            }
        })
    }

    fn delete_thumbnail<'a>(&'a self, file_id: &'a str) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.blobs.remove(file_id);
            state.deleted.push(file_id.to_string());
        })
    }
}

pub fn id(letter: char) -> TileId {
    TileId::new(letter).unwrap()
}

pub fn note(letter: char, text: &str) -> TileUpdate {
    TileUpdate::new(id(letter)).note(text)
}

/// Lets spawned tasks run without moving the clock.
pub async fn run_pending() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
