// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tb-core: Shared library for the tileboard client
//!
//! This crate provides the tile data model, the manifest codec, and the
//! thumbnail pipeline. Nothing in here touches the network or the local
//! filesystem; the `tileboard` crate layers storage and sync on top.

pub mod error;
pub mod manifest;
pub mod thumb;
pub mod tile;

pub use error::{Error, Result, ValidationError};
pub use thumb::{EncoderSupport, ImageSource, Thumbnail, ThumbnailOptions};
pub use tile::{Reconciled, Tile, TileId, TileSet, TileUpdate};
