// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.folder_name, "ABChallenge");
    assert_eq!(config.manifest_name, "tiles.json");
    assert_eq!(config.debounce_ms, 800);
    assert_eq!(config.saved_display_ms, 2000);
}

#[test]
fn test_full_file_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "folder_name = \"Board\"\ndebounce_ms = 250\n",
    )
    .unwrap();

    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config.folder_name, "Board");
    assert_eq!(config.debounce_ms, 250);
    assert_eq!(config.saved_display_ms, 2000);
}

#[test]
fn test_partial_file_fills_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "folder_name = \"Mine\"\n").unwrap();

    let config = Config::load(temp.path()).unwrap();
    assert_eq!(config.folder_name, "Mine");
    assert_eq!(config.manifest_name, DEFAULT_MANIFEST_NAME);
    assert_eq!(config.thumb_max_size, 512);
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "debounce_ms = \"soon\"").unwrap();

    let err = Config::load(temp.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn test_empty_folder_name_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "folder_name = \"  \"").unwrap();

    let err = Config::load(temp.path()).unwrap_err();
    assert!(err.to_string().contains("folder_name cannot be empty"));
}

#[test]
fn test_overrides_apply() {
    let mut config = Config::default();
    config.apply_overrides(Some("Other".to_string()), Some("256".to_string()));
    assert_eq!(config.folder_name, "Other");
    assert_eq!(config.thumb_max_size, 256);
}

#[test]
fn test_invalid_size_override_ignored() {
    let mut config = Config::default();
    config.apply_overrides(None, Some("huge".to_string()));
    assert_eq!(config.thumb_max_size, DEFAULT_MAX_SIZE);
    config.apply_overrides(None, Some("0".to_string()));
    assert_eq!(config.thumb_max_size, DEFAULT_MAX_SIZE);
}

#[test]
fn test_engine_config_durations() {
    let config = Config::default();
    let engine = config.engine_config();
    assert_eq!(engine.debounce, Duration::from_millis(800));
    assert_eq!(engine.saved_display, Duration::from_millis(2000));
}

#[test]
fn test_endpoints_strip_trailing_slash() {
    let config = Config {
        api_base: "http://localhost:9000/drive/v3/".to_string(),
        ..Config::default()
    };
    assert_eq!(config.endpoints().api_base, "http://localhost:9000/drive/v3");
}
