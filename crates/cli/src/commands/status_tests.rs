// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::load;
use crate::commands::testing::{run_to_exit, text, Fixture};
use crate::sync::test_helpers::{note, MockTileStore};
use tb_core::TileSet;

#[tokio::test]
async fn test_status_online_signed_in() {
    let fx = Fixture::ready().await;
    let mut buf = Vec::new();
    run_impl(&fx.engine, true, 0, OutputFormat::Text, &mut buf).unwrap();
    assert_eq!(text(buf), "Board: online\nSave: up to date\n");
}

#[tokio::test]
async fn test_status_load_failure_is_reported() {
    let store = MockTileStore::new();
    store.fail_load(true);
    let fx = Fixture::over(store);
    assert!(fx.engine.initialize().await.is_err());

    let mut buf = Vec::new();
    run_impl(&fx.engine, false, 0, OutputFormat::Text, &mut buf).unwrap();
    let out = text(buf);
    assert!(out.starts_with("Board: not loaded\n"));
    assert!(out.contains("Last error: "));
    assert!(out.contains("Session: signed out"));
}

#[tokio::test]
async fn test_status_json_reports_pending_copy() {
    let store = MockTileStore::with_remote(TileSet::initial().into_vec());
    let fx = Fixture::over(store);
    fx.engine.initialize().await.unwrap();
    fx.store.fail_save(true);
    fx.engine.update_tile(note('A', "Ant")).unwrap();
    fx.engine.save_now().await.unwrap();

    let mut buf = Vec::new();
    run_impl(&fx.engine, true, 0, OutputFormat::Json, &mut buf).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text(buf)).unwrap();
    assert_eq!(value["initialized"], true);
    assert_eq!(value["offline"], true);
    assert_eq!(value["saveStatus"], "error");
    assert_eq!(value["pendingChanges"], true);
    assert!(value["pendingSince"].is_string());
    assert_eq!(value["signedIn"], true);
    assert_eq!(value["duplicateFolders"], 0);
}

#[test]
fn test_status_after_load_reports_finished_write() {
    let store = MockTileStore::new();
    let out = run_to_exit(async {
        let fx = Fixture::over(store.clone());
        load(&fx.engine).await.unwrap();
        let mut buf = Vec::new();
        run_impl(&fx.engine, true, 0, OutputFormat::Text, &mut buf).unwrap();
        text(buf)
    });

    assert!(out.contains("Save: saved"));
    assert_eq!(store.saves().len(), 1);
}

#[tokio::test]
async fn test_status_warns_about_duplicate_folders() {
    let fx = Fixture::ready().await;
    let mut buf = Vec::new();
    run_impl(&fx.engine, true, 3, OutputFormat::Text, &mut buf).unwrap();
    assert!(text(buf).ends_with("Warning: 3 folders share the board's name, the newest is used\n"));
}

#[tokio::test]
async fn test_status_single_folder_has_no_warning() {
    let fx = Fixture::ready().await;
    let mut buf = Vec::new();
    run_impl(&fx.engine, true, 1, OutputFormat::Text, &mut buf).unwrap();
    assert!(!text(buf).contains("Warning"));
}
