// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod edit;
pub mod list;
pub mod show;
pub mod status;
pub mod sync;
pub mod thumb;

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::auth::{NoPrompt, SessionTokens, TokenPrompt};
use crate::cache::PendingCache;
use crate::config::{state_dir, Config};
use crate::drive::{DriveClient, DriveStorage};
use crate::env;
use crate::error::{Error, Result};
use crate::sync::{SaveStatus, SyncEngine, SyncState, TileStore};

/// Engine wired to the live drive.
pub type DriveEngine = SyncEngine<DriveStorage<DriveClient>>;

/// Resolved configuration and directories for one invocation.
pub struct Session {
    pub config: Config,
    pub state_dir: PathBuf,
}

impl Session {
    pub fn resolve() -> Result<Self> {
        Ok(Session {
            config: Config::resolve()?,
            state_dir: state_dir(),
        })
    }

    /// Session tokens, with the environment token taking precedence.
    pub fn tokens(&self, prompt: Box<dyn TokenPrompt>) -> SessionTokens {
        SessionTokens::open(&self.state_dir, prompt).with_env_token(env::access_token())
    }

    pub fn cache(&self) -> PendingCache {
        PendingCache::open(&self.state_dir)
    }

    /// Builds an engine without contacting the drive.
    ///
    /// Requests never prompt; a missing session surfaces as a load failure.
    pub fn engine(&self) -> Result<DriveEngine> {
        let tokens = Arc::new(self.tokens(Box::new(NoPrompt)));
        let client = DriveClient::new(self.config.endpoints(), tokens, self.config.request_timeout())?;
        let storage = DriveStorage::new(
            client,
            self.config.folder_name.clone(),
            self.config.manifest_name.clone(),
        );
        Ok(SyncEngine::new(storage, self.cache(), self.config.engine_config()))
    }

    /// Builds an engine and loads the board. See [`load`].
    pub async fn open_board(&self) -> Result<DriveEngine> {
        let engine = self.engine()?;
        load(&engine).await?;
        Ok(engine)
    }
}

/// Initializes `engine` and waits for any write the load scheduled.
///
/// A fresh or repaired board is written during load; the process must not
/// exit before that write lands. A failed write is kept locally and
/// reported on stderr, since the loaded board is still usable.
pub async fn load<S: TileStore>(engine: &SyncEngine<S>) -> Result<SyncState> {
    engine.initialize().await?;
    let state = engine.settle().await;
    offline_notice(&state);
    if state.save_status == SaveStatus::Error {
        let reason = state.last_error.as_deref().unwrap_or("unknown error");
        eprintln!("warning: save failed, changes kept locally: {reason}");
    }
    Ok(state)
}

/// Warns on stderr when the board came from the local copy.
fn offline_notice(state: &SyncState) {
    if !state.offline {
        return;
    }
    match &state.last_error {
        Some(reason) => eprintln!("warning: drive unreachable, showing local copy ({reason})"),
        None => eprintln!("warning: drive unreachable, showing local copy"),
    }
}

/// Writes pending edits now and turns a failed write into an error.
///
/// The board is already cached locally when this fails.
pub async fn persist<S: TileStore>(engine: &SyncEngine<S>) -> Result<SyncState> {
    let state = engine.save_now().await?;
    debug!(status = %state.save_status, "write finished");
    if state.save_status == SaveStatus::Error {
        let reason = state
            .last_error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(Error::SaveFailed(reason));
    }
    Ok(state)
}
