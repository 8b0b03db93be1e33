// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration management.
//!
//! Configuration is stored in `config.toml` under the config directory and
//! covers where the board lives remotely and how eagerly edits are synced.
//! Every field is optional; a missing file means all defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tb_core::thumb::{ThumbnailOptions, DEFAULT_MAX_SIZE, DEFAULT_QUALITY};
use tracing::warn;

use crate::drive::Endpoints;
use crate::env;
use crate::error::{Error, Result};
use crate::sync::EngineConfig;

const APP_DIR_NAME: &str = "tileboard";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_FOLDER_NAME: &str = "ABChallenge";
pub const DEFAULT_MANIFEST_NAME: &str = "tiles.json";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Tileboard configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote folder holding the manifest and thumbnails.
    pub folder_name: String,
    /// Name of the JSON manifest inside the folder.
    pub manifest_name: String,
    /// Base URL for metadata requests.
    pub api_base: String,
    /// Base URL for content uploads.
    pub upload_base: String,
    /// Quiet period after the last edit before a save starts.
    pub debounce_ms: u64,
    /// How long "saved" is shown before reverting to idle.
    pub saved_display_ms: u64,
    /// Longer-side cap for thumbnails, in pixels.
    pub thumb_max_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            debounce_ms: 800,
            saved_display_ms: 2000,
            thumb_max_size: DEFAULT_MAX_SIZE,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from `config.toml` in `config_dir`.
    ///
    /// A missing file yields the defaults.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the default config directory and applies environment
    /// overrides.
    pub fn resolve() -> Result<Self> {
        let mut config = Config::load(&config_dir())?;
        config.apply_overrides(env::folder_name(), env::thumb_max_size());
        Ok(config)
    }

    /// Applies override values. An unparseable size is ignored with a warning.
    pub fn apply_overrides(&mut self, folder_name: Option<String>, thumb_max_size: Option<String>) {
        if let Some(name) = folder_name {
            self.folder_name = name;
        }
        if let Some(raw) = thumb_max_size {
            match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => self.thumb_max_size = size,
                _ => warn!(value = %raw, "ignoring invalid thumbnail size override"),
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.folder_name.trim().is_empty() {
            return Err(Error::Config("folder_name cannot be empty".to_string()));
        }
        if self.manifest_name.trim().is_empty() {
            return Err(Error::Config("manifest_name cannot be empty".to_string()));
        }
        if self.thumb_max_size == 0 {
            return Err(Error::Config("thumb_max_size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            saved_display: Duration::from_millis(self.saved_display_ms),
        }
    }

    pub fn thumbnail_options(&self) -> ThumbnailOptions {
        ThumbnailOptions {
            max_size: self.thumb_max_size,
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            api_base: self.api_base.trim_end_matches('/').to_string(),
            upload_base: self.upload_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Directory holding `config.toml`.
///
/// Uses `TILEBOARD_CONFIG_DIR` if set, otherwise the platform config dir.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = env::config_dir() {
        return dir;
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".tileboard"))
}

/// Directory holding the session and the pending local copy.
///
/// Resolution order: `TILEBOARD_STATE_DIR`, `$XDG_STATE_HOME/tileboard`,
/// the platform state dir, then the local data dir.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(xdg) = env::xdg_state_home() {
        return xdg.join(APP_DIR_NAME);
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".tileboard"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
