// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Keeps the in-memory board and the remote store in step.
//!
//! ```text
//! ┌─────────────┐ edits ┌─────────────┐ debounced ┌─────────────┐
//! │   Caller    │──────►│ SyncEngine  │──────────►│  TileStore  │
//! │ (commands)  │◄──────│   (state)   │   save    │   (trait)   │
//! └─────────────┘ watch └─────────────┘           └─────────────┘
//!                              │ on failure
//!                              ▼
//!                       ┌─────────────┐
//!                       │PendingCache │
//!                       └─────────────┘
//! ```
//!
//! Edits apply in memory at once. A background worker writes the board
//! after a quiet period, at most one write at a time, always the newest
//! state. A failed write keeps a local copy and flags the engine offline;
//! the next edit or an explicit save tries again.

mod engine;
mod state;
mod store;

pub use engine::{EngineConfig, SyncEngine, DEFAULT_DEBOUNCE, DEFAULT_SAVED_DISPLAY};
pub use state::{SaveStatus, SyncState};
pub use store::TileStore;

#[cfg(test)]
pub(crate) mod test_helpers;
