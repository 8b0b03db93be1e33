// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DriveResult;

/// Boxed future returned by [`ObjectStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = DriveResult<T>> + Send + 'a>>;

/// Mime type the drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// File metadata as returned by the drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

/// Where a name lookup searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Folders anywhere in the drive.
    Folder,
    /// Files directly inside the given folder id.
    InFolder(String),
}

/// Object-level operations against the remote drive.
///
/// Implemented by [`DriveClient`](super::DriveClient) for production and by
/// an in-memory store in tests.
pub trait ObjectStore: Send + Sync {
    /// Most recently modified non-trashed file matching `name`, if any.
    fn find_by_name<'a>(&'a self, name: &'a str, lookup: &'a Lookup) -> StoreFuture<'a, Option<DriveFile>>;

    /// Every non-trashed file or folder named `name`, newest first.
    fn list_by_name<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Vec<DriveFile>>;

    fn create_folder<'a>(&'a self, name: &'a str) -> StoreFuture<'a, DriveFile>;

    /// Creates a JSON file inside `parent`.
    fn create_file<'a>(&'a self, name: &'a str, content: &'a str, parent: &'a str) -> StoreFuture<'a, DriveFile>;

    /// Replaces the content of an existing JSON file.
    fn update_file<'a>(&'a self, file_id: &'a str, content: &'a str) -> StoreFuture<'a, ()>;

    fn read_file<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, String>;

    /// Creates a binary file inside `parent`.
    fn upload_binary<'a>(
        &'a self,
        name: &'a str,
        bytes: Vec<u8>,
        mime: &'a str,
        parent: &'a str,
    ) -> StoreFuture<'a, DriveFile>;

    fn download_binary<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, Vec<u8>>;

    fn delete_file<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, ()>;
}
