// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Attaching thumbnails to tiles.
//!
//! The image is encoded locally, uploaded as its own file, and the tile is
//! pointed at it through a normal engine update. The previous thumbnail is
//! deleted afterwards on a best-effort basis.

use chrono::Utc;
use tb_core::thumb::create_thumbnail;
use tb_core::{EncoderSupport, ImageSource, Tile, TileId, TileUpdate, ThumbnailOptions};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sync::{SyncEngine, TileStore};

/// Remote file name for a thumbnail uploaded now.
pub fn thumbnail_name(id: TileId, millis: i64, extension: &str) -> String {
    format!("thumb_{id}_{millis}.{extension}")
}

/// Thumbnail operations on top of a [`SyncEngine`].
pub struct Thumbnails<S> {
    engine: SyncEngine<S>,
    options: ThumbnailOptions,
    support: EncoderSupport,
}

impl<S: TileStore> Thumbnails<S> {
    pub fn new(engine: SyncEngine<S>, options: ThumbnailOptions) -> Self {
        Thumbnails {
            engine,
            options,
            support: EncoderSupport::cached(),
        }
    }

    /// Overrides encoder detection.
    pub fn with_support(mut self, support: EncoderSupport) -> Self {
        self.support = support;
        self
    }

    fn tile(&self, id: TileId) -> Result<Tile> {
        if !self.engine.state().is_initialized {
            return Err(Error::NotInitialized);
        }
        self.engine
            .get_tile(id)
            .ok_or_else(|| Error::TileNotFound(id.to_string()))
    }

    /// Encodes `bytes`, uploads the result and attaches it to tile `id`.
    ///
    /// Validation happens before anything is uploaded. Returns the updated
    /// tile.
    pub async fn set_thumbnail(&self, id: TileId, bytes: &[u8], source: &ImageSource) -> Result<Tile> {
        let previous = self.tile(id)?.thumb_file_id;
        let thumbnail = create_thumbnail(bytes, source, &self.options, self.support)?;
        debug!(
            tile = %id,
            width = thumbnail.width,
            height = thumbnail.height,
            size = thumbnail.bytes.len(),
            format = thumbnail.format.mime(),
            "encoded thumbnail"
        );

        let name = thumbnail_name(id, Utc::now().timestamp_millis(), thumbnail.format.extension());
        let file_id = self
            .engine
            .store()
            .upload_thumbnail(&name, thumbnail.bytes, thumbnail.format.mime())
            .await?;
        info!(tile = %id, file = %file_id, "uploaded thumbnail");

        let tiles = self
            .engine
            .update_tile(TileUpdate::new(id).thumb_file_id(Some(file_id.clone())))?;

        if let Some(old) = previous.filter(|old| *old != file_id) {
            self.engine.store().delete_thumbnail(&old).await;
        }

        tiles
            .get(id)
            .cloned()
            .ok_or_else(|| Error::TileNotFound(id.to_string()))
    }

    /// Detaches the thumbnail from tile `id` and deletes it.
    ///
    /// Returns the removed file id, if there was one.
    pub async fn clear_thumbnail(&self, id: TileId) -> Result<Option<String>> {
        let Some(previous) = self.tile(id)?.thumb_file_id else {
            return Ok(None);
        };
        self.engine
            .update_tile(TileUpdate::new(id).thumb_file_id(None))?;
        self.engine.store().delete_thumbnail(&previous).await;
        Ok(Some(previous))
    }

    /// Downloads the encoded thumbnail of tile `id`, if it has one.
    pub async fn fetch_thumbnail(&self, id: TileId) -> Result<Option<Vec<u8>>> {
        let Some(file_id) = self.tile(id)?.thumb_file_id else {
            return Ok(None);
        };
        let bytes = self.engine.store().download_thumbnail(&file_id).await?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
#[path = "thumbs_tests.rs"]
mod tests;
