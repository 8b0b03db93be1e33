// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::auth::AuthError;

/// Error type for drive operations.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// No usable access token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The API answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The request never got an answer.
    #[error("network error: {0}")]
    Network(String),

    /// The answer could not be read.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl DriveError {
    pub fn status(&self) -> Option<u16> {
        match self {
            DriveError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for drive operations.
pub type DriveResult<T> = Result<T, DriveError>;
