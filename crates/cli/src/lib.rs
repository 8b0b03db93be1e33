// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tileboard - an A-Z board of notes, dates and thumbnails kept in a drive folder.
//!
//! # Main Components
//!
//! - [`sync::SyncEngine`] - in-memory board with debounced, latest-wins writes
//! - [`drive`] - drive REST client and the folder/manifest layout on top of it
//! - [`cache::PendingCache`] - local copy of writes that did not reach the drive
//! - [`auth`] - stored session tokens
//! - [`thumbs::Thumbnails`] - encoding and attaching tile thumbnails
//!
//! ```rust,ignore
//! use tileboard::{cache::PendingCache, sync::{EngineConfig, SyncEngine}};
//!
//! let engine = SyncEngine::new(storage, PendingCache::open(&state_dir), EngineConfig::default());
//! engine.initialize().await?;
//! engine.update_tile(TileUpdate::new(id).note("Cat"))?;
//! let state = engine.settle().await;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
pub mod help;

pub mod auth;
pub mod cache;
pub mod config;
pub mod drive;
pub mod env;
pub mod error;
pub mod sync;
pub mod thumbs;

pub use cli::{AuthCommand, Cli, Command, OutputFormat, ThumbCommand};
pub use config::Config;
pub use error::{Error, Result};

use commands::edit::EditArgs;
use commands::sync::SyncMode;
use commands::Session;

/// Execute a CLI command on a single-threaded runtime.
pub fn run(command: Command) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(command))
}

async fn dispatch(command: Command) -> Result<()> {
    let session = Session::resolve()?;
    match command {
        Command::List { output } => commands::list::run(&session, output).await,
        Command::Show { id, output } => commands::show::run(&session, id, output).await,
        Command::Edit {
            id,
            note,
            date,
            enable_date,
            no_date,
            output,
        } => {
            let args = EditArgs {
                note,
                date,
                enable_date,
                no_date,
            };
            commands::edit::run(&session, id, args, output).await
        }
        Command::Thumb(cmd) => commands::thumb::run(&session, cmd).await,
        Command::Status { output } => commands::status::run(&session, output).await,
        Command::Sync { adopt, discard } => {
            commands::sync::run(&session, SyncMode::from_flags(adopt, discard)).await
        }
        Command::Auth(cmd) => commands::auth::run(&session, cmd),
    }
}
