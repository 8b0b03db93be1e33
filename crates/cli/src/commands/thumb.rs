// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::io::Write;
use std::path::Path;

use tb_core::{ImageSource, TileId};

use crate::cli::ThumbCommand;
use crate::error::{Error, Result};
use crate::sync::{SyncEngine, TileStore};
use crate::thumbs::Thumbnails;

use super::{persist, Session};

pub async fn run(session: &Session, cmd: ThumbCommand) -> Result<()> {
    let engine = session.open_board().await?;
    let thumbs = Thumbnails::new(engine.clone(), session.config.thumbnail_options());
    let mut out = std::io::stdout().lock();
    match cmd {
        ThumbCommand::Set { id, path } => set(&engine, &thumbs, id, &path, &mut out).await,
        ThumbCommand::Clear { id } => clear(&engine, &thumbs, id, &mut out).await,
        ThumbCommand::Get { id, out: dest } => get(&thumbs, id, &dest, &mut out).await,
    }
}

pub(crate) async fn set<S: TileStore>(
    engine: &SyncEngine<S>,
    thumbs: &Thumbnails<S>,
    id: TileId,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let size = fs::metadata(path)?.len();
    let source = ImageSource::from_name(name, size);
    // Reject by name and size before reading the whole file.
    tb_core::thumb::validate_image(&source)?;

    let bytes = fs::read(path)?;
    let tile = thumbs.set_thumbnail(id, &bytes, &source).await?;
    persist(engine).await?;

    let file_id = tile.thumb_file_id.unwrap_or_default();
    writeln!(out, "Set thumbnail on tile {id} ({file_id})")?;
    Ok(())
}

pub(crate) async fn clear<S: TileStore>(
    engine: &SyncEngine<S>,
    thumbs: &Thumbnails<S>,
    id: TileId,
    out: &mut impl Write,
) -> Result<()> {
    match thumbs.clear_thumbnail(id).await? {
        Some(_) => {
            persist(engine).await?;
            writeln!(out, "Cleared thumbnail on tile {id}")?;
        }
        None => writeln!(out, "Tile {id} has no thumbnail")?,
    }
    Ok(())
}

pub(crate) async fn get<S: TileStore>(
    thumbs: &Thumbnails<S>,
    id: TileId,
    dest: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let bytes = thumbs
        .fetch_thumbnail(id)
        .await?
        .ok_or_else(|| Error::NoThumbnail(id.to_string()))?;
    fs::write(dest, &bytes)?;
    writeln!(out, "Wrote {} bytes to {}", bytes.len(), dest.display())?;
    Ok(())
}

#[cfg(test)]
#[path = "thumb_tests.rs"]
mod tests;
