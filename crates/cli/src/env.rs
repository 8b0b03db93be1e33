// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule. Empty values are treated as unset.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns `true` if `NO_COLOR=1`.
pub fn no_color() -> bool {
    std::env::var(vars::NO_COLOR).is_ok_and(|v| v == "1")
}

/// Returns `true` if `COLOR=1`.
pub fn force_color() -> bool {
    std::env::var(vars::COLOR).is_ok_and(|v| v == "1")
}

/// Returns the value of `TILEBOARD_CONFIG_DIR` if set.
pub fn config_dir() -> Option<PathBuf> {
    non_empty(vars::TILEBOARD_CONFIG_DIR).map(PathBuf::from)
}

/// Returns the value of `TILEBOARD_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(vars::TILEBOARD_STATE_DIR).map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    non_empty(vars::XDG_STATE_HOME).map(PathBuf::from)
}

/// Returns a token from `TILEBOARD_ACCESS_TOKEN`, bypassing the stored session.
pub fn access_token() -> Option<String> {
    non_empty(vars::TILEBOARD_ACCESS_TOKEN).map(|v| v.trim().to_string())
}

/// Returns the value of `TILEBOARD_FOLDER_NAME` if set.
pub fn folder_name() -> Option<String> {
    non_empty(vars::TILEBOARD_FOLDER_NAME)
}

/// Returns the raw value of `TILEBOARD_THUMB_MAX_SIZE` if set.
pub fn thumb_max_size() -> Option<String> {
    non_empty(vars::TILEBOARD_THUMB_MAX_SIZE)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
