// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core tile types for the tileboard.
//!
//! The board always holds exactly 26 tiles, one per letter A-Z, kept in
//! alphabetical order. Everything here is pure: no I/O, no clocks other
//! than `Utc::now` for fresh timestamps.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of tiles on a board.
pub const TILE_COUNT: usize = 26;

/// Identity of a tile: a single uppercase letter A-Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TileId(u8);

impl TileId {
    /// Creates a tile id from a letter. Lowercase letters are upper-cased.
    pub fn new(letter: char) -> Result<Self> {
        let upper = letter.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Ok(TileId(upper as u8))
        } else {
            Err(Error::InvalidTileId(letter.to_string()))
        }
    }

    /// All 26 ids in alphabetical order.
    pub fn all() -> impl Iterator<Item = TileId> {
        (b'A'..=b'Z').map(TileId)
    }

    pub fn as_char(&self) -> char {
        self.0 as char
    }

    /// Zero-based position on the board (A = 0).
    pub fn index(&self) -> usize {
        usize::from(self.0 - b'A')
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for TileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => TileId::new(c),
            _ => Err(Error::InvalidTileId(s.to_string())),
        }
    }
}

impl TryFrom<String> for TileId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TileId> for String {
    fn from(id: TileId) -> Self {
        id.to_string()
    }
}

/// One lettered slot on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: TileId,
    #[serde(default)]
    pub note: String,
    /// Gates whether `date` is meaningful. When false, `date` should be None.
    #[serde(default)]
    pub date_enabled: bool,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Remote object holding the thumbnail, if any.
    #[serde(default)]
    pub thumb_file_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Tile {
    /// Returns the date only when the date flag is on.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        if self.date_enabled {
            self.date
        } else {
            None
        }
    }

    /// True if the tile carries no user content.
    pub fn is_blank(&self) -> bool {
        self.note.is_empty() && !self.date_enabled && self.date.is_none() && self.thumb_file_id.is_none()
    }
}

/// Partial update of a single tile.
///
/// Fields left as `None` are untouched. The nested `Option` on `date` and
/// `thumb_file_id` distinguishes "leave alone" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUpdate {
    pub id: TileId,
    pub note: Option<String>,
    pub date_enabled: Option<bool>,
    pub date: Option<Option<NaiveDate>>,
    pub thumb_file_id: Option<Option<String>>,
}

impl TileUpdate {
    pub fn new(id: TileId) -> Self {
        TileUpdate {
            id,
            note: None,
            date_enabled: None,
            date: None,
            thumb_file_id: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn date_enabled(mut self, enabled: bool) -> Self {
        self.date_enabled = Some(enabled);
        self
    }

    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn thumb_file_id(mut self, file_id: Option<String>) -> Self {
        self.thumb_file_id = Some(file_id);
        self
    }

    /// True if no field would change.
    pub fn is_empty(&self) -> bool {
        self.note.is_none()
            && self.date_enabled.is_none()
            && self.date.is_none()
            && self.thumb_file_id.is_none()
    }

    fn merge_into(&self, tile: &mut Tile) {
        if let Some(note) = &self.note {
            tile.note = note.clone();
        }
        if let Some(enabled) = self.date_enabled {
            tile.date_enabled = enabled;
        }
        if let Some(date) = self.date {
            tile.date = date;
        }
        if let Some(file_id) = &self.thumb_file_id {
            tile.thumb_file_id = file_id.clone();
        }
    }
}

/// The canonical collection of tiles.
///
/// A set produced by [`TileSet::initial`] or [`reconcile`] always holds one
/// tile per letter in alphabetical order. [`TileSet::default`] is the empty
/// pre-load state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TileSet {
    tiles: Vec<Tile>,
}

impl TileSet {
    /// 26 blank tiles.
    pub fn initial() -> Self {
        create_initial_tiles()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if every letter is present exactly once, in order.
    pub fn is_complete(&self) -> bool {
        self.tiles.len() == TILE_COUNT && self.tiles.iter().zip(TileId::all()).all(|(t, id)| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn into_vec(self) -> Vec<Tile> {
        self.tiles
    }

    /// Looks up a tile by id.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        // Complete sets are indexed by letter; fall back to a scan otherwise.
        match self.tiles.get(id.index()) {
            Some(tile) if tile.id == id => Some(tile),
            _ => self.tiles.iter().find(|t| t.id == id),
        }
    }

    /// Returns a new set with `update` applied. See [`apply_update`].
    pub fn apply(&self, update: &TileUpdate) -> TileSet {
        apply_update(self, update)
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// Creates a blank tile for the given letter.
pub fn create_empty_tile(id: TileId) -> Tile {
    Tile {
        id,
        note: String::new(),
        date_enabled: false,
        date: None,
        thumb_file_id: None,
        updated_at: Utc::now(),
    }
}

/// Creates the 26-tile alphabetical board.
pub fn create_initial_tiles() -> TileSet {
    TileSet {
        tiles: TileId::all().map(create_empty_tile).collect(),
    }
}

/// Applies a partial update, returning a new collection.
///
/// The input is left untouched. Only the tile matching `update.id` changes;
/// its `updated_at` is refreshed and always moves strictly forward.
pub fn apply_update(tiles: &TileSet, update: &TileUpdate) -> TileSet {
    apply_update_at(tiles, update, Utc::now())
}

/// [`apply_update`] with an explicit wall-clock reading.
pub fn apply_update_at(tiles: &TileSet, update: &TileUpdate, now: DateTime<Utc>) -> TileSet {
    let tiles = tiles
        .iter()
        .map(|tile| {
            if tile.id != update.id {
                return tile.clone();
            }
            let mut next = tile.clone();
            update.merge_into(&mut next);
            next.updated_at = next_timestamp(tile.updated_at, now);
            next
        })
        .collect();
    TileSet { tiles }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Picks a timestamp strictly after `previous`, preferring `now`.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The complete, ordered collection.
    pub tiles: TileSet,
    /// Letters that were absent and synthesized as blank tiles.
    pub missing: Vec<TileId>,
    /// True if the result differs from the input in any way (missing
    /// letters, duplicates dropped, or order restored).
    pub changed: bool,
}

/// Restores the board invariant on a loaded snapshot.
///
/// Missing letters are synthesized as blank tiles. Duplicate ids keep the
/// most recently updated entry. Tiles that were already present come through
/// unchanged. Running this on an already complete set is a no-op.
pub fn reconcile(loaded: Vec<Tile>) -> Reconciled {
    let input_order: Vec<TileId> = loaded.iter().map(|t| t.id).collect();
    let mut by_id: BTreeMap<TileId, Tile> = BTreeMap::new();
    let mut had_duplicates = false;

    for tile in loaded {
        match by_id.get(&tile.id) {
            Some(existing) => {
                had_duplicates = true;
                if tile.updated_at > existing.updated_at {
                    by_id.insert(tile.id, tile);
                }
            }
            None => {
                by_id.insert(tile.id, tile);
            }
        }
    }

    let mut missing = Vec::new();
    for id in TileId::all() {
        by_id.entry(id).or_insert_with(|| {
            missing.push(id);
            create_empty_tile(id)
        });
    }

    let in_order = input_order.iter().copied().eq(TileId::all());
    let changed = had_duplicates || !missing.is_empty() || !in_order;

    Reconciled {
        tiles: TileSet {
            tiles: by_id.into_values().collect(),
        },
        missing,
        changed,
    }
}

#[cfg(test)]
#[path = "tile_tests.rs"]
mod tests;
