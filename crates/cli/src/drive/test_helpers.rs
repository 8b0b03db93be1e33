// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory object store for drive tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::error::{DriveError, DriveResult};
use super::request;
use super::store::{DriveFile, Lookup, ObjectStore, StoreFuture, FOLDER_MIME_TYPE};

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub meta: DriveFile,
    pub parent: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    files: Vec<StoredFile>,
    next_id: u64,
    calls: Vec<String>,
    failures: HashMap<&'static str, u16>,
    race_on_create_folder: bool,
}

/// Object store that keeps everything in memory.
///
/// Clones share state, so a test can keep a handle after moving the store
/// into the code under test.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    state: Arc<Mutex<MockState>>,
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

impl MockState {
    fn insert(&mut self, name: &str, mime: &str, parent: Option<&str>, content: Vec<u8>) -> DriveFile {
        self.next_id += 1;
        let stamp = epoch() + Duration::seconds(self.next_id as i64);
        let meta = DriveFile {
            id: format!("file-{}", self.next_id),
            name: name.to_string(),
            mime_type: mime.to_string(),
            modified_time: Some(stamp),
            created_time: Some(stamp),
        };
        self.files.push(StoredFile {
            meta: meta.clone(),
            parent: parent.map(str::to_string),
            content,
        });
        meta
    }

    fn check(&mut self, op: &'static str) -> DriveResult<()> {
        self.calls.push(op.to_string());
        match self.failures.get(op) {
            Some(&status) => Err(DriveError::Status {
                status,
                message: format!("mock {op} failure"),
            }),
            None => Ok(()),
        }
    }

    fn get_mut(&mut self, id: &str) -> DriveResult<&mut StoredFile> {
        self.files
            .iter_mut()
            .find(|f| f.meta.id == id)
            .ok_or_else(|| DriveError::Status {
                status: 404,
                message: format!("File not found: {id}"),
            })
    }
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_folder(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.insert(name, FOLDER_MIME_TYPE, None, Vec::new()).id
    }

    pub fn insert_file(&self, name: &str, parent: &str, content: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state
            .insert(name, "application/json", Some(parent), content.as_bytes().to_vec())
            .id
    }

    pub fn remove(&self, id: &str) {
        self.state.lock().unwrap().files.retain(|f| f.meta.id != id);
    }

    pub fn file(&self, id: &str) -> Option<StoredFile> {
        let state = self.state.lock().unwrap();
        state.files.iter().find(|f| f.meta.id == id).cloned()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.file(id).map(|f| String::from_utf8(f.content).unwrap())
    }

    /// All files named `name`.
    pub fn named(&self, name: &str) -> Vec<StoredFile> {
        let state = self.state.lock().unwrap();
        state.files.iter().filter(|f| f.meta.name == name).cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    /// Makes every call to `op` fail with `status`.
    pub fn fail(&self, op: &'static str, status: u16) {
        self.state.lock().unwrap().failures.insert(op, status);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.lock().unwrap().failures.remove(op);
    }

    /// The next folder create loses a race: another session's folder
    /// appears and the create itself fails.
    pub fn race_on_create_folder(&self) {
        self.state.lock().unwrap().race_on_create_folder = true;
    }
}

impl ObjectStore for MockObjectStore {
    fn find_by_name<'a>(&'a self, name: &'a str, lookup: &'a Lookup) -> StoreFuture<'a, Option<DriveFile>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("find_by_name")?;
            let matches = state
                .files
                .iter()
                .filter(|f| f.meta.name == name)
                .filter(|f| match lookup {
                    Lookup::Folder => f.meta.mime_type == FOLDER_MIME_TYPE,
                    Lookup::InFolder(parent) => f.parent.as_deref() == Some(parent.as_str()),
                })
                .map(|f| f.meta.clone())
                .collect();
            Ok(request::pick_most_recent(matches))
        })
    }

    fn list_by_name<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Vec<DriveFile>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("list_by_name")?;
            let mut files: Vec<DriveFile> = state
                .files
                .iter()
                .filter(|f| f.meta.name == name)
                .map(|f| f.meta.clone())
                .collect();
            request::sort_newest_first(&mut files);
            Ok(files)
        })
    }

    fn create_folder<'a>(&'a self, name: &'a str) -> StoreFuture<'a, DriveFile> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.race_on_create_folder {
                state.race_on_create_folder = false;
                state.calls.push("create_folder".to_string());
                state.insert(name, FOLDER_MIME_TYPE, None, Vec::new());
                return Err(DriveError::Status {
                    status: 409,
                    message: "Failed to create folder: Conflict".to_string(),
                });
            }
            state.check("create_folder")?;
            Ok(state.insert(name, FOLDER_MIME_TYPE, None, Vec::new()))
        })
    }

    fn create_file<'a>(&'a self, name: &'a str, content: &'a str, parent: &'a str) -> StoreFuture<'a, DriveFile> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("create_file")?;
            Ok(state.insert(name, "application/json", Some(parent), content.as_bytes().to_vec()))
        })
    }

    fn update_file<'a>(&'a self, file_id: &'a str, content: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("update_file")?;
            state.get_mut(file_id)?.content = content.as_bytes().to_vec();
            Ok(())
        })
    }

    fn read_file<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("read_file")?;
            let file = state.get_mut(file_id)?;
            Ok(String::from_utf8_lossy(&file.content).into_owned())
        })
    }

    fn upload_binary<'a>(
        &'a self,
        name: &'a str,
        bytes: Vec<u8>,
        mime: &'a str,
        parent: &'a str,
    ) -> StoreFuture<'a, DriveFile> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("upload_binary")?;
            Ok(state.insert(name, mime, Some(parent), bytes))
        })
    }

    fn download_binary<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("download_binary")?;
            Ok(state.get_mut(file_id)?.content.clone())
        })
    }

    fn delete_file<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.check("delete_file")?;
            state.get_mut(file_id)?;
            state.files.retain(|f| f.meta.id != file_id);
            Ok(())
        })
    }
}
