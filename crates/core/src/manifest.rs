// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest codec.
//!
//! The manifest is the single remote object holding the board: a
//! human-readable (indented) JSON array of tile records.

use crate::error::Result;
use crate::tile::{Tile, TileSet};

/// Serializes a tile set as an indented JSON array.
pub fn encode(tiles: &TileSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(tiles)?)
}

/// Parses a manifest body.
///
/// The result is not reconciled; pass it through
/// [`reconcile`](crate::tile::reconcile) before use.
pub fn decode(content: &str) -> Result<Vec<Tile>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
