// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote drive access.
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ DriveStorage │────►│ ObjectStore │────►│ DriveClient │──► drive API
//! │ (TileStore)  │     │   (trait)   │     │  (reqwest)  │
//! └──────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! [`DriveClient`] speaks the file-storage HTTP API: search by name,
//! multipart create, media update, download and delete. [`DriveStorage`]
//! layers the board's folder and manifest conventions on top and is what
//! the sync engine talks to.

mod client;
mod error;
pub mod request;
mod storage;
mod store;

pub use client::{DriveClient, Endpoints};
pub use error::{DriveError, DriveResult};
pub use storage::DriveStorage;
pub use store::{DriveFile, Lookup, ObjectStore, StoreFuture};

#[cfg(test)]
mod test_helpers;
