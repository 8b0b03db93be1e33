// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the drive file API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::{DriveError, DriveResult};
use super::request::{self, FileMetadata};
use super::store::{DriveFile, Lookup, ObjectStore, StoreFuture};
use crate::auth::AccessTokens;

const JSON_MIME_TYPE: &str = "application/json";

/// Base URLs for the two halves of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Metadata and download requests.
    pub api_base: String,
    /// Content uploads.
    pub upload_base: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Drive API client authenticated with bearer tokens.
pub struct DriveClient {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    endpoints: Endpoints,
}

impl DriveClient {
    pub fn new(endpoints: Endpoints, tokens: Arc<dyn AccessTokens>, timeout: Duration) -> DriveResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tileboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DriveError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(DriveClient {
            http,
            tokens,
            endpoints,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> DriveResult<RequestBuilder> {
        let token = self.tokens.ensure_access_token()?;
        Ok(builder.bearer_auth(token))
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.endpoints.api_base)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.endpoints.api_base, file_id)
    }

    async fn send(&self, builder: RequestBuilder, operation: &str) -> DriveResult<Response> {
        let response = self
            .authorized(builder)?
            .send()
            .await
            .map_err(|e| DriveError::Network(format!("{operation}: {e}")))?;
        check_status(response, operation).await
    }

    async fn search(&self, query: String, operation: &str) -> DriveResult<Vec<DriveFile>> {
        debug!(%query, "searching drive");
        let builder = self.http.get(self.files_url()).query(&[
            ("q", query.as_str()),
            ("spaces", "drive"),
            ("fields", request::FILE_LIST_FIELDS),
            ("orderBy", "modifiedTime desc"),
        ]);
        let response = self.send(builder, operation).await?;
        let list: FileList = decode_json(response).await?;
        Ok(list.files)
    }

    async fn create_multipart(&self, metadata: FileMetadata<'_>, content_type: &str, payload: &[u8], operation: &str) -> DriveResult<DriveFile> {
        let body = request::multipart_body(&metadata, content_type, payload)
            .map_err(|e| DriveError::Decode(format!("failed to encode metadata: {e}")))?;
        let builder = self
            .http
            .post(format!("{}/files", self.endpoints.upload_base))
            .query(&[("uploadType", "multipart"), ("fields", request::FILE_FIELDS)])
            .header(CONTENT_TYPE, request::multipart_content_type())
            .body(body);
        let response = self.send(builder, operation).await?;
        decode_json(response).await
    }
}

async fn check_status(response: Response, operation: &str) -> DriveResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DriveError::Status {
        status: status.as_u16(),
        message: request::status_message(operation, status.canonical_reason(), &body),
    })
}

async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> DriveResult<T> {
    response
        .json()
        .await
        .map_err(|e| DriveError::Decode(e.to_string()))
}

impl ObjectStore for DriveClient {
    fn find_by_name<'a>(&'a self, name: &'a str, lookup: &'a Lookup) -> StoreFuture<'a, Option<DriveFile>> {
        Box::pin(async move {
            let mut files = self
                .search(request::find_query(name, lookup), "Failed to find file")
                .await?;
            if files.len() > 1 {
                request::sort_newest_first(&mut files);
                warn!(
                    name,
                    count = files.len(),
                    chosen = %files[0].id,
                    "multiple matches, using the most recently modified"
                );
            }
            Ok(request::pick_most_recent(files))
        })
    }

    fn list_by_name<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Vec<DriveFile>> {
        Box::pin(async move {
            let mut files = self
                .search(request::list_query(name), "Failed to list files")
                .await?;
            request::sort_newest_first(&mut files);
            Ok(files)
        })
    }

    fn create_folder<'a>(&'a self, name: &'a str) -> StoreFuture<'a, DriveFile> {
        Box::pin(async move {
            let builder = self
                .http
                .post(self.files_url())
                .query(&[("fields", request::FILE_FIELDS)])
                .json(&FileMetadata::folder(name));
            let response = self.send(builder, "Failed to create folder").await?;
            decode_json(response).await
        })
    }

    fn create_file<'a>(&'a self, name: &'a str, content: &'a str, parent: &'a str) -> StoreFuture<'a, DriveFile> {
        Box::pin(async move {
            let metadata = FileMetadata::file(name, JSON_MIME_TYPE, parent);
            self.create_multipart(metadata, JSON_MIME_TYPE, content.as_bytes(), "Failed to create file")
                .await
        })
    }

    fn update_file<'a>(&'a self, file_id: &'a str, content: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let builder = self
                .http
                .patch(format!("{}/files/{}", self.endpoints.upload_base, file_id))
                .query(&[("uploadType", "media")])
                .header(CONTENT_TYPE, JSON_MIME_TYPE)
                .body(content.to_string());
            self.send(builder, "Failed to update file").await?;
            Ok(())
        })
    }

    fn read_file<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            let builder = self.http.get(self.file_url(file_id)).query(&[("alt", "media")]);
            let response = self.send(builder, "Failed to read file").await?;
            response
                .text()
                .await
                .map_err(|e| DriveError::Decode(e.to_string()))
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
            let metadata = FileMetadata::file(name, mime, parent);
            self.create_multipart(metadata, mime, &bytes, "Failed to upload blob")
                .await
        })
    }

    fn download_binary<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let builder = self.http.get(self.file_url(file_id)).query(&[("alt", "media")]);
            let response = self.send(builder, "Failed to download file").await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| DriveError::Decode(e.to_string()))?;
            Ok(bytes.to_vec())
        })
    }

    fn delete_file<'a>(&'a self, file_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let builder = self.http.delete(self.file_url(file_id));
            self.send(builder, "Failed to delete file").await?;
            Ok(())
        })
    }
}
