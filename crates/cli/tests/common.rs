// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens on the discard port, so requests fail fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Isolated config and state directories for one test.
pub struct Home {
    pub temp: TempDir,
}

impl Home {
    /// Config pointing every request at an unreachable host.
    pub fn offline() -> Self {
        let temp = TempDir::new().unwrap();
        let home = Home { temp };
        fs::create_dir_all(home.config_dir()).unwrap();
        fs::create_dir_all(home.state_dir()).unwrap();
        fs::write(
            home.config_dir().join("config.toml"),
            format!(
                "api_base = \"{UNREACHABLE}\"\nupload_base = \"{UNREACHABLE}\"\nrequest_timeout_secs = 2\n"
            ),
        )
        .unwrap();
        home
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.temp.path().join("state")
    }

    pub fn pending_path(&self) -> PathBuf {
        self.state_dir().join("pending.json")
    }

    /// `tileboard` with this home and no ambient token or overrides.
    pub fn tileboard(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("tileboard");
        cmd.env("TILEBOARD_CONFIG_DIR", self.config_dir())
            .env("TILEBOARD_STATE_DIR", self.state_dir())
            .env("NO_COLOR", "1")
            .env_remove("TILEBOARD_ACCESS_TOKEN")
            .env_remove("TILEBOARD_FOLDER_NAME")
            .env_remove("TILEBOARD_THUMB_MAX_SIZE")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Same as [`Home::tileboard`] but with a token, so requests are attempted.
    pub fn signed_in(&self) -> Command {
        let mut cmd = self.tileboard();
        cmd.env("TILEBOARD_ACCESS_TOKEN", "test-token");
        cmd
    }

    /// Writes a pending local copy with `notes` applied to blank tiles.
    pub fn seed_pending(&self, notes: &[(char, &str)]) {
        let tiles: Vec<serde_json::Value> = ('A'..='Z')
            .map(|letter| {
                let note = notes
                    .iter()
                    .find(|(l, _)| *l == letter)
                    .map(|(_, n)| *n)
                    .unwrap_or("");
                serde_json::json!({
                    "id": letter.to_string(),
                    "note": note,
                    "dateEnabled": false,
                    "date": null,
                    "thumbFileId": null,
                    "updatedAt": "2026-01-01T00:00:00Z",
                })
            })
            .collect();
        let snapshot = serde_json::json!({
            "tiles": tiles,
            "timestamp": "2026-01-02T00:00:00Z",
        });
        fs::write(self.pending_path(), serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
    }

    pub fn pending(&self) -> Option<String> {
        fs::read_to_string(self.pending_path()).ok()
    }
}
