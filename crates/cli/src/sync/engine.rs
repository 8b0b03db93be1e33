// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tb_core::tile::reconcile;
use tb_core::{Tile, TileId, TileSet, TileUpdate};
use tokio::sync::{watch, Notify};
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use super::state::{SaveStatus, SyncState};
use super::store::TileStore;
use crate::cache::PendingCache;
use crate::drive::DriveResult;
use crate::error::{Error, Result};

/// Quiet period after the last edit before a write starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// How long `saved` stays visible before reverting to `idle`.
pub const DEFAULT_SAVED_DISPLAY: Duration = Duration::from_millis(2000);

/// Timing knobs for [`SyncEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub debounce: Duration,
    pub saved_display: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            debounce: DEFAULT_DEBOUNCE,
            saved_display: DEFAULT_SAVED_DISPLAY,
        }
    }
}

/// Bookkeeping for pending writes. Lock before touching `state`.
#[derive(Debug, Default)]
struct Schedule {
    /// Bumped on every change that needs writing.
    edit_seq: u64,
    /// Highest `edit_seq` handed to the store.
    attempted_seq: u64,
    /// When the waiting write may start. Every edit pushes it back.
    deadline: Option<Instant>,
    /// Bumped on every status change so a stale idle reset is a no-op.
    status_epoch: u64,
}

struct Inner<S> {
    store: S,
    cache: PendingCache,
    config: EngineConfig,
    state: watch::Sender<SyncState>,
    schedule: Mutex<Schedule>,
    wake: Notify,
    init_lock: tokio::sync::Mutex<()>,
    persist_lock: tokio::sync::Mutex<()>,
    cancel: CancellationToken,
}

/// Handle to the board and its background writer.
///
/// Clones share one engine. The writer stops once the last handle is
/// dropped. Must be created inside a tokio runtime.
pub struct SyncEngine<S> {
    inner: Arc<Inner<S>>,
    _shutdown: Arc<DropGuard>,
}

impl<S> Clone for SyncEngine<S> {
    fn clone(&self) -> Self {
        SyncEngine {
            inner: Arc::clone(&self.inner),
            _shutdown: Arc::clone(&self._shutdown),
        }
    }
}

impl<S: TileStore> SyncEngine<S> {
    pub fn new(store: S, cache: PendingCache, config: EngineConfig) -> Self {
        let cancel = CancellationToken::new();
        let (state, _) = watch::channel(SyncState::default());
        let inner = Arc::new(Inner {
            store,
            cache,
            config,
            state,
            schedule: Mutex::new(Schedule::default()),
            wake: Notify::new(),
            init_lock: tokio::sync::Mutex::new(()),
            persist_lock: tokio::sync::Mutex::new(()),
            cancel: cancel.clone(),
        });
        tokio::spawn(persist_worker(Arc::clone(&inner)));
        SyncEngine {
            inner,
            _shutdown: Arc::new(cancel.drop_guard()),
        }
    }

    /// Loads the board.
    ///
    /// Prefers the remote snapshot, repairing it if tiles are missing. When
    /// the remote store is unreachable, falls back to the local pending
    /// copy and starts offline. Fails only if neither is available.
    /// Calling again after success does nothing.
    pub async fn initialize(&self) -> Result<()> {
        let inner = &self.inner;
        let _init = inner.init_lock.lock().await;
        let initialized = inner.state.borrow().is_initialized;
        if initialized {
            return Ok(());
        }

        match inner.store.load().await {
            Ok(remote) => {
                let pending = inner.cache.has();
                let (tiles, needs_save) = match remote {
                    None => {
                        info!("no saved board found, starting a new one");
                        (TileSet::initial(), true)
                    }
                    Some(loaded) => {
                        let reconciled = reconcile(loaded);
                        if !reconciled.missing.is_empty() {
                            info!(missing = %join_ids(&reconciled.missing), "restored missing tiles");
                        }
                        (reconciled.tiles, reconciled.changed)
                    }
                };
                if pending {
                    info!("an unsynced local copy exists");
                }
                inner.install(tiles, |s| {
                    s.offline = false;
                    s.pending_changes = pending;
                    s.last_error = None;
                });
                if needs_save {
                    inner.request_persist(Duration::ZERO);
                }
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "could not reach the remote store");
                match inner.cache.get() {
                    Some(cached) => {
                        info!("using the unsynced local copy");
                        let tiles = reconcile(cached).tiles;
                        inner.install(tiles, |s| {
                            s.offline = true;
                            s.pending_changes = true;
                            s.last_error = Some(message);
                        });
                        Ok(())
                    }
                    None => {
                        inner
                            .state
                            .send_modify(|s| s.last_error = Some(message.clone()));
                        Err(Error::Initialization(message))
                    }
                }
            }
        }
    }

    /// Applies a partial update in memory and schedules a debounced write.
    ///
    /// Returns the new board.
    pub fn update_tile(&self, update: TileUpdate) -> Result<Arc<TileSet>> {
        let inner = &*self.inner;
        let mut schedule = inner.schedule();
        let current = {
            let state = inner.state.borrow();
            if !state.is_initialized {
                return Err(Error::NotInitialized);
            }
            Arc::clone(&state.tiles)
        };
        if current.get(update.id).is_none() {
            return Err(Error::TileNotFound(update.id.to_string()));
        }

        let next = Arc::new(current.apply(&update));
        schedule.edit_seq += 1;
        schedule.status_epoch += 1;
        schedule.deadline = Some(Instant::now() + inner.config.debounce);
        inner.state.send_modify(|s| {
            s.tiles = Arc::clone(&next);
            s.save_status = SaveStatus::Saving;
        });
        drop(schedule);

        inner.wake.notify_one();
        debug!(tile = %update.id, "tile updated, write scheduled");
        Ok(next)
    }

    /// Writes the current board now, skipping the debounce.
    ///
    /// Waits for the write (and any newer one it makes room for) to finish.
    pub async fn save_now(&self) -> Result<SyncState> {
        {
            let mut schedule = self.inner.schedule();
            if !self.inner.state.borrow().is_initialized {
                return Err(Error::NotInitialized);
            }
            if schedule.attempted_seq >= schedule.edit_seq {
                schedule.edit_seq += 1;
            }
            schedule.deadline = None;
            schedule.status_epoch += 1;
            self.inner
                .state
                .send_modify(|s| s.save_status = SaveStatus::Saving);
        }
        self.inner.drain().await;
        Ok(self.state())
    }

    /// Waits until no write is scheduled or in flight.
    pub async fn settle(&self) -> SyncState {
        let mut rx = self.inner.state.subscribe();
        let settled = rx
            .wait_for(|s| s.save_status != SaveStatus::Saving)
            .await
            .map(|s| s.clone());
        match settled {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Replaces the board with the local pending copy and writes it.
    ///
    /// Returns false if there was no pending copy.
    pub async fn adopt_pending(&self) -> Result<bool> {
        let initialized = self.inner.state.borrow().is_initialized;
        if !initialized {
            return Err(Error::NotInitialized);
        }
        let Some(cached) = self.inner.cache.get() else {
            return Ok(false);
        };
        let tiles = reconcile(cached).tiles;
        self.inner.install(tiles, |_| {});
        self.save_now().await?;
        Ok(true)
    }

    /// Drops the local pending copy without writing it.
    pub fn discard_pending(&self) {
        let _schedule = self.inner.schedule();
        self.inner.cache.clear();
        self.inner.state.send_modify(|s| s.pending_changes = false);
    }

    pub fn clear_error(&self) {
        self.inner.state.send_modify(|s| s.last_error = None);
    }

    pub fn state(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    pub fn tiles(&self) -> Arc<TileSet> {
        Arc::clone(&self.inner.state.borrow().tiles)
    }

    pub fn get_tile(&self, id: TileId) -> Option<Tile> {
        self.inner.state.borrow().tiles.get(id).cloned()
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn cache(&self) -> &PendingCache {
        &self.inner.cache
    }
}

impl<S: TileStore> Inner<S> {
    fn schedule(&self) -> MutexGuard<'_, Schedule> {
        self.schedule.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces the board and marks the engine initialized.
    fn install(&self, tiles: TileSet, apply: impl FnOnce(&mut SyncState)) {
        let _schedule = self.schedule();
        let tiles = Arc::new(tiles);
        self.state.send_modify(|s| {
            s.tiles = tiles;
            s.is_initialized = true;
            apply(s);
        });
    }

    /// Marks the board dirty and wakes the writer after `delay`.
    fn request_persist(&self, delay: Duration) {
        {
            let mut schedule = self.schedule();
            schedule.edit_seq += 1;
            schedule.status_epoch += 1;
            schedule.deadline = Some(Instant::now() + delay);
            self.state.send_modify(|s| s.save_status = SaveStatus::Saving);
        }
        self.wake.notify_one();
    }

    /// Writes until the store has seen the newest edit.
    ///
    /// Edits made while a write is in flight are written right after it,
    /// as one write of the latest board.
    async fn drain(self: &Arc<Self>) {
        let _persisting = self.persist_lock.lock().await;
        loop {
            let (snapshot, seq) = {
                let mut schedule = self.schedule();
                if schedule.attempted_seq >= schedule.edit_seq {
                    return;
                }
                schedule.deadline = None;
                let tiles = Arc::clone(&self.state.borrow().tiles);
                (tiles, schedule.edit_seq)
            };

            debug!(seq, "writing board");
            let result = self.store.save(&snapshot).await;

            let caught_up = {
                let mut schedule = self.schedule();
                schedule.attempted_seq = seq;
                let caught_up = schedule.edit_seq == seq;
                self.finish_persist(&mut schedule, result, &snapshot, caught_up);
                caught_up
            };
            if caught_up {
                return;
            }
            debug!("newer edits arrived during the write");
        }
    }

    fn finish_persist(
        self: &Arc<Self>,
        schedule: &mut Schedule,
        result: DriveResult<()>,
        snapshot: &TileSet,
        caught_up: bool,
    ) {
        match result {
            Ok(()) => {
                self.cache.clear();
                self.state.send_modify(|s| {
                    s.offline = false;
                    s.pending_changes = false;
                    s.last_error = None;
                    if caught_up {
                        s.save_status = SaveStatus::Saved;
                    }
                });
                if caught_up {
                    schedule.status_epoch += 1;
                    self.schedule_idle_reset(schedule.status_epoch);
                    info!("board saved");
                }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "write failed, keeping a local copy");
                self.cache.put(snapshot.as_slice());
                schedule.status_epoch += 1;
                self.state.send_modify(|s| {
                    s.offline = true;
                    s.pending_changes = true;
                    s.last_error = Some(message);
                    if caught_up {
                        s.save_status = SaveStatus::Error;
                    }
                });
            }
        }
    }

    fn schedule_idle_reset(self: &Arc<Self>, epoch: u64) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = inner.cancel.cancelled() => {}
                _ = tokio::time::sleep(inner.config.saved_display) => {
                    let schedule = inner.schedule();
                    if schedule.status_epoch == epoch {
                        inner.state.send_if_modified(|s| {
                            if s.save_status == SaveStatus::Saved {
                                s.save_status = SaveStatus::Idle;
                                true
                            } else {
                                false
                            }
                        });
                    }
                }
            }
        });
    }
}

/// Background writer: waits for edits, lets the debounce run out, writes.
async fn persist_worker<S: TileStore>(inner: Arc<Inner<S>>) {
    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => return,
            _ = inner.wake.notified() => {}
        }

        loop {
            let Some(deadline) = inner.schedule().deadline else {
                break;
            };
            tokio::select! {
                _ = inner.cancel.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }
            let unchanged = inner.schedule().deadline == Some(deadline);
            if unchanged {
                break;
            }
        }

        inner.drain().await;
    }
}

fn join_ids(ids: &[TileId]) -> String {
    ids.iter().map(TileId::to_string).collect::<Vec<_>>().join(",")
}
