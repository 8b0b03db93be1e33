// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request building for the drive API.
//!
//! Everything here is pure so queries and upload bodies can be checked
//! without a network.

use serde::Serialize;

use super::store::{DriveFile, Lookup, FOLDER_MIME_TYPE};

/// Boundary separating the parts of a multipart upload.
pub const MULTIPART_BOUNDARY: &str = "-------314159265358979323846";

/// Fields requested for every file in a listing.
pub const FILE_LIST_FIELDS: &str = "files(id,name,mimeType,modifiedTime,createdTime)";

/// Fields requested when a single file is created.
pub const FILE_FIELDS: &str = "id,name,mimeType,modifiedTime,createdTime";

/// Quotes a value for use inside a single-quoted query literal.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Query for a named, non-trashed file or folder.
pub fn find_query(name: &str, lookup: &Lookup) -> String {
    let base = format!("name='{}' and trashed=false", escape_query_value(name));
    match lookup {
        Lookup::Folder => format!("{base} and mimeType='{FOLDER_MIME_TYPE}'"),
        Lookup::InFolder(parent) => format!("{base} and '{}' in parents", escape_query_value(parent)),
    }
}

/// Query for everything non-trashed with the given name.
pub fn list_query(name: &str) -> String {
    format!("name='{}' and trashed=false", escape_query_value(name))
}

/// Orders matches newest first, ties broken by id, and takes the head.
pub fn pick_most_recent(mut files: Vec<DriveFile>) -> Option<DriveFile> {
    sort_newest_first(&mut files);
    files.into_iter().next()
}

/// Sorts newest first. Files without a modification time sort last.
pub fn sort_newest_first(files: &mut [DriveFile]) {
    files.sort_by(|a, b| {
        b.modified_time
            .cmp(&a.modified_time)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Metadata part of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<&'a str>,
}

impl<'a> FileMetadata<'a> {
    pub fn folder(name: &'a str) -> Self {
        FileMetadata {
            name,
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: Vec::new(),
        }
    }

    pub fn file(name: &'a str, mime: &'a str, parent: &'a str) -> Self {
        FileMetadata {
            name,
            mime_type: Some(mime),
            parents: vec![parent],
        }
    }
}

/// `Content-Type` header value for a multipart upload.
pub fn multipart_content_type() -> String {
    format!("multipart/related; boundary=\"{MULTIPART_BOUNDARY}\"")
}

/// Builds a two-part `multipart/related` body: JSON metadata, then payload.
pub fn multipart_body(metadata: &FileMetadata<'_>, content_type: &str, payload: &[u8]) -> serde_json::Result<Vec<u8>> {
    let metadata = serde_json::to_string(metadata)?;
    let mut body = Vec::with_capacity(metadata.len() + payload.len() + 256);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.as_bytes());
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--").as_bytes());
    Ok(body)
}

/// Human-readable message for a failed call.
pub fn status_message(operation: &str, reason: Option<&str>, body: &str) -> String {
    let reason = reason.unwrap_or("unknown status");
    let body = body.trim();
    if body.is_empty() {
        format!("{operation}: {reason}")
    } else {
        format!("{operation}: {reason} - {body}")
    }
}
