// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Board persistence on the drive.
//!
//! The board lives in one folder holding a JSON manifest plus one file per
//! thumbnail. Folder and manifest ids are looked up once and cached; lookup
//! is serialized so concurrent first calls cannot create two folders.

use std::future::Future;
use std::pin::Pin;

use tb_core::{manifest, Tile, TileSet};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::error::{DriveError, DriveResult};
use super::store::{DriveFile, Lookup, ObjectStore, StoreFuture, FOLDER_MIME_TYPE};
use crate::sync::TileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Located {
    folder_id: String,
    manifest_id: Option<String>,
}

fn location_mut(slot: &mut Option<Located>) -> DriveResult<&mut Located> {
    slot.as_mut()
        .ok_or_else(|| DriveError::Decode("board location unavailable".to_string()))
}

/// [`TileStore`] backed by an [`ObjectStore`].
pub struct DriveStorage<S> {
    store: S,
    folder_name: String,
    manifest_name: String,
    located: Mutex<Option<Located>>,
}

impl<S: ObjectStore> DriveStorage<S> {
    pub fn new(store: S, folder_name: impl Into<String>, manifest_name: impl Into<String>) -> Self {
        DriveStorage {
            store,
            folder_name: folder_name.into(),
            manifest_name: manifest_name.into(),
            located: Mutex::new(None),
        }
    }

    /// Finds or creates the board folder and returns its id.
    pub async fn initialize(&self) -> DriveResult<String> {
        let mut slot = self.locate().await?;
        Ok(location_mut(&mut slot)?.folder_id.clone())
    }

    async fn locate(&self) -> DriveResult<MutexGuard<'_, Option<Located>>> {
        let mut slot = self.located.lock().await;
        if slot.is_none() {
            let folder = self.find_or_create_folder().await?;
            let manifest = self
                .store
                .find_by_name(&self.manifest_name, &Lookup::InFolder(folder.id.clone()))
                .await?;
            debug!(folder = %folder.id, manifest = ?manifest.as_ref().map(|f| &f.id), "located board");
            *slot = Some(Located {
                folder_id: folder.id,
                manifest_id: manifest.map(|f| f.id),
            });
        }
        Ok(slot)
    }

    async fn find_or_create_folder(&self) -> DriveResult<DriveFile> {
        if let Some(folder) = self.store.find_by_name(&self.folder_name, &Lookup::Folder).await? {
            info!(id = %folder.id, name = %self.folder_name, "found existing folder");
            return Ok(folder);
        }

        match self.store.create_folder(&self.folder_name).await {
            Ok(folder) => {
                info!(id = %folder.id, name = %self.folder_name, "created folder");
                Ok(folder)
            }
            Err(create_err) => {
                // Another session may have created it in the meantime.
                warn!(error = %create_err, "folder create failed, looking it up again");
                match self.store.find_by_name(&self.folder_name, &Lookup::Folder).await? {
                    Some(folder) => Ok(folder),
                    None => Err(create_err),
                }
            }
        }
    }

    /// Reads and parses the manifest.
    ///
    /// Returns `Ok(None)` if there is no manifest, it vanished, or it does
    /// not parse.
    pub async fn load_tiles(&self) -> DriveResult<Option<Vec<Tile>>> {
        let mut slot = self.locate().await?;
        let located = location_mut(&mut slot)?;
        let Some(manifest_id) = located.manifest_id.clone() else {
            return Ok(None);
        };

        let content = match self.store.read_file(&manifest_id).await {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                warn!(id = %manifest_id, "manifest disappeared");
                located.manifest_id = None;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match manifest::decode(&content) {
            Ok(tiles) => Ok(Some(tiles)),
            Err(e) => {
                warn!(error = %e, "manifest is unreadable, starting from a blank board");
                Ok(None)
            }
        }
    }

    /// Writes the manifest, creating it if it does not exist yet.
    pub async fn save_tiles(&self, tiles: &TileSet) -> DriveResult<()> {
        let content = manifest::encode(tiles).map_err(|e| DriveError::Decode(e.to_string()))?;
        let mut slot = self.locate().await?;
        let located = location_mut(&mut slot)?;

        if let Some(id) = located.manifest_id.clone() {
            match self.store.update_file(&id, &content).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_not_found() => {
                    warn!(id = %id, "manifest disappeared, recreating");
                    located.manifest_id = None;
                }
                Err(e) => return Err(e),
            }
        }

        let folder = Lookup::InFolder(located.folder_id.clone());
        if let Some(existing) = self.store.find_by_name(&self.manifest_name, &folder).await? {
            self.store.update_file(&existing.id, &content).await?;
            located.manifest_id = Some(existing.id);
            return Ok(());
        }

        let created = self
            .store
            .create_file(&self.manifest_name, &content, &located.folder_id)
            .await?;
        info!(id = %created.id, "created manifest");
        located.manifest_id = Some(created.id);
        Ok(())
    }

    pub async fn upload_thumbnail_file(&self, name: &str, bytes: Vec<u8>, mime: &str) -> DriveResult<String> {
        let folder_id = {
            let mut slot = self.locate().await?;
            location_mut(&mut slot)?.folder_id.clone()
        };
        let file = self.store.upload_binary(name, bytes, mime, &folder_id).await?;
        debug!(id = %file.id, name, "uploaded thumbnail");
        Ok(file.id)
    }

    pub async fn delete_thumbnail_file(&self, file_id: &str) {
        if let Err(e) = self.store.delete_file(file_id).await {
            warn!(id = file_id, error = %e, "failed to delete thumbnail");
        }
    }

    /// Every folder carrying the board's name, newest first.
    pub async fn duplicate_folders(&self) -> DriveResult<Vec<DriveFile>> {
        let files = self.store.list_by_name(&self.folder_name).await?;
        Ok(files
            .into_iter()
            .filter(|f| f.mime_type == FOLDER_MIME_TYPE)
            .collect())
    }
}

impl<S: ObjectStore + 'static> TileStore for DriveStorage<S> {
    fn load(&self) -> StoreFuture<'_, Option<Vec<Tile>>> {
        Box::pin(self.load_tiles())
    }

    fn save<'a>(&'a self, tiles: &'a TileSet) -> StoreFuture<'a, ()> {
        Box::pin(self.save_tiles(tiles))
    }

    fn upload_thumbnail<'a>(&'a self, name: &'a str, bytes: Vec<u8>, mime: &'a str) -> StoreFuture<'a, String> {
        Box::pin(self.upload_thumbnail_file(name, bytes, mime))
    }

    fn download_thumbnail<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, Vec<u8>> {
        self.store.download_binary(file_id)
    }

    fn delete_thumbnail<'a>(&'a self, file_id: &'a str) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(self.delete_thumbnail_file(file_id))
    }
}
