// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Access tokens for the remote drive.
//!
//! The CLI keeps a short-lived bearer token in `session.json` under the state
//! directory. Tokens are treated as expired five minutes before their stated
//! expiry so requests never race the deadline. `TILEBOARD_ACCESS_TOKEN`
//! bypasses the stored session entirely.

use std::fs;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const SESSION_FILE_NAME: &str = "session.json";

/// Margin before expiry at which a token is no longer handed out.
pub const EXPIRY_BUFFER_SECS: i64 = 5 * 60;

/// Lifetime assumed for a pasted token when none is given.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Error type for authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not signed in\n  hint: run 'tileboard auth login' to sign in")]
    SignInRequired,

    #[error("session expired\n  hint: run 'tileboard auth login' to sign in again")]
    Expired,

    #[error("sign-in failed: {0}")]
    Denied(String),

    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Source of bearer tokens for drive requests.
///
/// Implementations are shared across concurrent requests.
pub trait AccessTokens: Send + Sync {
    /// Returns a usable token, signing in if needed.
    fn ensure_access_token(&self) -> Result<String, AuthError>;

    /// Returns the current token without prompting.
    fn get_access_token(&self) -> Option<String>;

    /// Runs the interactive sign-in flow and stores the result.
    fn sign_in(&self) -> Result<String, AuthError>;

    /// Forgets any stored token.
    fn sign_out(&self) -> Result<(), AuthError>;
}

/// A token with its absolute expiry, as stored in `session.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>, expires_in_secs: i64, now: DateTime<Utc>) -> Self {
        SessionToken {
            access_token: access_token.into(),
            expires_at: now + Duration::seconds(expires_in_secs),
        }
    }

    /// True if the token is still outside the expiry buffer at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + Duration::seconds(EXPIRY_BUFFER_SECS)
    }
}

/// A token handed back by the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in_secs: i64,
}

/// Interactive half of sign-in.
pub trait TokenPrompt: Send + Sync {
    fn request_token(&self) -> Result<TokenGrant, AuthError>;
}

/// Reads a pasted token from the terminal.
///
/// Fails with [`AuthError::SignInRequired`] when stdin is not a TTY, so
/// scripted runs error out instead of hanging.
pub struct TerminalPrompt;

impl TokenPrompt for TerminalPrompt {
    fn request_token(&self) -> Result<TokenGrant, AuthError> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return Err(AuthError::SignInRequired);
        }

        let mut stderr = std::io::stderr();
        write!(stderr, "Paste an access token for the drive API: ")?;
        stderr.flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        let token = line.trim();
        if token.is_empty() {
            return Err(AuthError::Denied("no token entered".to_string()));
        }
        Ok(TokenGrant {
            access_token: token.to_string(),
            expires_in_secs: DEFAULT_TOKEN_LIFETIME_SECS,
        })
    }
}

/// Never signs in. Used where prompting is not allowed.
pub struct NoPrompt;

impl TokenPrompt for NoPrompt {
    fn request_token(&self) -> Result<TokenGrant, AuthError> {
        Err(AuthError::SignInRequired)
    }
}

/// File-backed session tokens.
pub struct SessionTokens {
    path: PathBuf,
    env_token: Option<String>,
    prompt: Box<dyn TokenPrompt>,
    cached: Mutex<Option<SessionToken>>,
}

impl SessionTokens {
    /// Opens the session stored in `state_dir`.
    pub fn open(state_dir: &Path, prompt: Box<dyn TokenPrompt>) -> Self {
        SessionTokens {
            path: state_dir.join(SESSION_FILE_NAME),
            env_token: None,
            prompt,
            cached: Mutex::new(None),
        }
    }

    /// Uses `token` ahead of anything stored.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        self.env_token = token;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores a granted token, replacing any existing session.
    pub fn store(&self, grant: TokenGrant) -> Result<SessionToken, AuthError> {
        let token = SessionToken::new(grant.access_token, grant.expires_in_secs, Utc::now());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&token)?)?;
        restrict_permissions(&self.path)?;
        *self.lock_cache() = Some(token.clone());
        info!(expires_at = %token.expires_at, "stored session token");
        Ok(token)
    }

    /// The stored session, fresh or not.
    pub fn stored(&self) -> Option<SessionToken> {
        if let Some(token) = self.lock_cache().clone() {
            return Some(token);
        }
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<SessionToken>(&content) {
            Ok(token) => {
                *self.lock_cache() = Some(token.clone());
                Some(token)
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable session file");
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    /// True if a token comes from the environment.
    pub fn uses_env_token(&self) -> bool {
        self.env_token.is_some()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<SessionToken>> {
        self.cached.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn forget(&self) -> Result<(), AuthError> {
        *self.lock_cache() = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl AccessTokens for SessionTokens {
    fn ensure_access_token(&self) -> Result<String, AuthError> {
        let had_session = self.env_token.is_none() && self.stored().is_some();
        if let Some(token) = self.get_access_token() {
            return Ok(token);
        }
        match self.sign_in() {
            Err(AuthError::SignInRequired) if had_session => Err(AuthError::Expired),
            result => result,
        }
    }

    fn get_access_token(&self) -> Option<String> {
        if let Some(token) = &self.env_token {
            return Some(token.clone());
        }
        let token = self.stored()?;
        if token.is_fresh(Utc::now()) {
            return Some(token.access_token);
        }
        debug!(expires_at = %token.expires_at, "stored session expired");
        if let Err(e) = self.forget() {
            warn!(error = %e, "failed to remove expired session");
        }
        None
    }

    fn sign_in(&self) -> Result<String, AuthError> {
        let grant = self.prompt.request_token()?;
        Ok(self.store(grant)?.access_token)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.forget()?;
        info!("signed out");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
