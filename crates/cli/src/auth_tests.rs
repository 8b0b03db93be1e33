// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Hands out a fixed token and counts how often it was asked.
struct CountingPrompt {
    token: &'static str,
    calls: Arc<AtomicUsize>,
}

impl TokenPrompt for CountingPrompt {
    fn request_token(&self) -> Result<TokenGrant, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TokenGrant {
            access_token: self.token.to_string(),
            expires_in_secs: DEFAULT_TOKEN_LIFETIME_SECS,
        })
    }
}

fn counting(dir: &TempDir) -> (SessionTokens, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let prompt = CountingPrompt {
        token: "fresh-token",
        calls: Arc::clone(&calls),
    };
    (SessionTokens::open(dir.path(), Box::new(prompt)), calls)
}

fn write_session(dir: &TempDir, token: &SessionToken) {
    fs::write(
        dir.path().join(SESSION_FILE_NAME),
        serde_json::to_string(token).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_is_fresh_honors_buffer() {
    let now = Utc::now();
    assert!(SessionToken::new("t", 3600, now).is_fresh(now));
    assert!(!SessionToken::new("t", 299, now).is_fresh(now));
    assert!(SessionToken::new("t", 301, now).is_fresh(now));
    assert!(!SessionToken::new("t", -10, now).is_fresh(now));
}

#[test]
fn test_session_json_uses_camel_case() {
    let token = SessionToken::new("abc", 60, Utc::now());
    let json = serde_json::to_string(&token).unwrap();
    assert!(json.contains("\"accessToken\":\"abc\""));
    assert!(json.contains("\"expiresAt\""));
}

#[test]
fn test_no_session_prompts_once_then_reuses() {
    let dir = TempDir::new().unwrap();
    let (tokens, calls) = counting(&dir);

    assert_eq!(tokens.get_access_token(), None);
    assert_eq!(tokens.ensure_access_token().unwrap(), "fresh-token");
    assert_eq!(tokens.ensure_access_token().unwrap(), "fresh-token");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(dir.path().join(SESSION_FILE_NAME).exists());
}

#[test]
fn test_stored_fresh_token_is_used_without_prompt() {
    let dir = TempDir::new().unwrap();
    write_session(&dir, &SessionToken::new("stored", 3600, Utc::now()));
    let (tokens, calls) = counting(&dir);

    assert_eq!(tokens.ensure_access_token().unwrap(), "stored");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_expired_token_is_discarded() {
    let dir = TempDir::new().unwrap();
    write_session(&dir, &SessionToken::new("old", 60, Utc::now()));
    let (tokens, _) = counting(&dir);

    assert_eq!(tokens.get_access_token(), None);
    assert!(!dir.path().join(SESSION_FILE_NAME).exists());
}

#[test]
fn test_corrupt_session_is_removed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(SESSION_FILE_NAME), "{not json").unwrap();
    let tokens = SessionTokens::open(dir.path(), Box::new(NoPrompt));

    assert_eq!(tokens.stored(), None);
    assert!(!dir.path().join(SESSION_FILE_NAME).exists());
}

#[test]
fn test_env_token_wins() {
    let dir = TempDir::new().unwrap();
    write_session(&dir, &SessionToken::new("stored", 3600, Utc::now()));
    let tokens = SessionTokens::open(dir.path(), Box::new(NoPrompt))
        .with_env_token(Some("from-env".to_string()));

    assert!(tokens.uses_env_token());
    assert_eq!(tokens.ensure_access_token().unwrap(), "from-env");
}

#[test]
fn test_no_prompt_requires_sign_in() {
    let dir = TempDir::new().unwrap();
    let tokens = SessionTokens::open(dir.path(), Box::new(NoPrompt));

    let err = tokens.ensure_access_token().unwrap_err();
    assert!(matches!(err, AuthError::SignInRequired));
}

#[test]
fn test_expired_session_without_prompt_reports_expiry() {
    let dir = TempDir::new().unwrap();
    write_session(&dir, &SessionToken::new("old", 60, Utc::now()));
    let tokens = SessionTokens::open(dir.path(), Box::new(NoPrompt));

    let err = tokens.ensure_access_token().unwrap_err();
    assert!(matches!(err, AuthError::Expired));
    assert!(err.to_string().contains("tileboard auth login"));
}

#[test]
fn test_expired_session_prompts_for_new_token() {
    let dir = TempDir::new().unwrap();
    write_session(&dir, &SessionToken::new("old", 60, Utc::now()));
    let (tokens, calls) = counting(&dir);

    assert_eq!(tokens.ensure_access_token().unwrap(), "fresh-token");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sign_out_removes_session() {
    let dir = TempDir::new().unwrap();
    let (tokens, _) = counting(&dir);
    tokens.sign_in().unwrap();

    tokens.sign_out().unwrap();
    assert!(!dir.path().join(SESSION_FILE_NAME).exists());
    assert_eq!(tokens.get_access_token(), None);
    // Signing out twice is fine.
    tokens.sign_out().unwrap();
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let (tokens, _) = counting(&dir);
    tokens.sign_in().unwrap();

    let mode = fs::metadata(tokens.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
