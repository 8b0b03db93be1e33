// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::auth::AuthError;
use crate::drive::DriveError;

/// All possible errors that can occur in the tileboard library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load tiles: {0}\n  hint: check your connection and sign-in, then try again")]
    Initialization(String),

    #[error("tiles not loaded yet")]
    NotInitialized,

    #[error("tile not found: {0}")]
    TileNotFound(String),

    #[error("nothing to change\n  hint: pass --note, --date, --enable-date or --no-date")]
    NothingToChange,

    #[error("no pending local changes")]
    NoPendingChanges,

    #[error("tile {0} has no thumbnail")]
    NoThumbnail(String),

    #[error("save failed, changes kept locally: {0}\n  hint: run `tileboard sync` to retry")]
    SaveFailed(String),

    #[error(transparent)]
    Core(#[from] tb_core::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Drive(#[from] DriveError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl From<tb_core::ValidationError> for Error {
    fn from(err: tb_core::ValidationError) -> Self {
        Error::Core(err.into())
    }
}

/// A specialized Result type for tileboard operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
