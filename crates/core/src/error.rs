// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tb-core operations.

use thiserror::Error;

/// All possible errors that can occur in tb-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid tile id: '{0}'\n  hint: tile ids are single letters A-Z")]
    InvalidTileId(String),

    #[error("invalid date: '{0}'\n  hint: dates use the YYYY-MM-DD format")]
    InvalidDate(String),

    #[error("malformed tile data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Rejections raised before an upload is decoded.
///
/// Messages are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "HEIC/HEIF images are not supported. Please convert to JPEG first \
         or use Export > Export Unmodified Original from the Photos app."
    )]
    HeicUnsupported,

    #[error("Invalid file type. Please use JPEG, PNG, GIF, or WebP.")]
    InvalidType,

    #[error("File too large. Maximum size is {max_mb}MB.")]
    TooLarge { size: u64, max_mb: u64 },
}

/// A specialized Result type for tb-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
