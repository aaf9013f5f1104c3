// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The dirty-tracked entity pattern.
//!
//! A [`SyncedEntity`] pairs an in-memory value with a dirty flag and the
//! timestamp of its last successful slow-tier write. The in-memory value is
//! the source of truth: every mutation writes through to the fast tier
//! before the mutating call returns, while the slow tier is updated
//! asynchronously by the scheduler or the sweep.
//!
//! Two instances back a [`WatchStore`](crate::WatchStore) — the group state
//! and the badge selection — but the pattern is generic over any
//! serializable payload.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::metrics;
use crate::storage::{StorageAdapter, StorageError};

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A synchronized state blob: in-memory value, dirty flag, last-sync time.
///
/// `dirty == false` implies the slow tier's last successfully observed
/// value equals the fast tier's value at the time of that sync. This is
/// best-effort: it is established by a successful flush, not re-verified.
#[derive(Debug)]
pub struct SyncedEntity<T> {
    label: &'static str,
    key: &'static str,
    sync_time_key: &'static str,
    value: T,
    dirty: bool,
    last_sync_ms: u64,
}

impl<T> SyncedEntity<T> {
    /// `key` is the tier-qualified storage key of the payload;
    /// `sync_time_key` holds the last-sync timestamp on the fast tier only.
    pub fn new(label: &'static str, key: &'static str, sync_time_key: &'static str, initial: T) -> Self {
        Self {
            label,
            key,
            sync_time_key,
            value: initial,
            dirty: false,
            last_sync_ms: 0,
        }
    }

    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Epoch millis of the last successful slow-tier write; 0 if never.
    #[must_use]
    pub fn last_sync_ms(&self) -> u64 {
        self.last_sync_ms
    }
}

impl<T> SyncedEntity<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Apply a pure transformation, write through to the fast tier, mark
    /// dirty. The caller is expected to hand the entity to the scheduler's
    /// `request_sync` next.
    ///
    /// When `mutate` returns, a reader of [`value`](Self::value) sees the
    /// new state; slow-tier durability is eventual.
    pub async fn mutate<F: FnOnce(&mut T)>(&mut self, local: &StorageAdapter, f: F) {
        f(&mut self.value);
        self.persist_local(local).await;
        self.dirty = true;
        metrics::set_entity_dirty(self.label, true);
    }

    /// [`mutate`](Self::mutate) with a whole replacement value.
    pub async fn replace(&mut self, local: &StorageAdapter, value: T) {
        self.mutate(local, |v| *v = value).await;
    }

    /// Unconditional fast-tier write-through. Failure is logged but does not
    /// roll back the in-memory mutation: the fast-tier write is best-effort
    /// durability, not a transaction guard.
    pub async fn persist_local(&self, local: &StorageAdapter) {
        match local.set(self.key, &self.value).await {
            Ok(()) => metrics::record_local_write(self.label, "success"),
            Err(error) => {
                warn!(entity = self.label, %error, "fast-tier write-through failed, in-memory value stands");
                metrics::record_local_write(self.label, "error");
            }
        }
    }

    /// Hydrate from storage: fast tier first, slow tier as fallback.
    ///
    /// Adopting a slow-tier value writes it back into the fast tier, so a
    /// fresh device self-heals. An entity whose value came from the fast
    /// tier but was never flushed (`last_sync == 0`) comes up dirty so the
    /// next sweep carries it over.
    pub async fn load(&mut self, local: &StorageAdapter, slow: &StorageAdapter) {
        let mut from_local = false;
        if let Some(value) = local.try_get::<T>(self.key).await {
            self.value = value;
            from_local = true;
        } else if let Some(value) = slow.try_get::<T>(self.key).await {
            debug!(entity = self.label, "fast tier empty, healing from slow tier");
            self.value = value;
            self.persist_local(local).await;
        }
        self.last_sync_ms = local.get(self.sync_time_key, 0u64).await;
        // Stay dirty across a reload (the re-adopted fast-tier value is our
        // own write-through), and come up dirty when the fast tier holds
        // data the slow tier has never seen.
        self.dirty = self.dirty || (from_local && self.last_sync_ms == 0);
        metrics::set_entity_dirty(self.label, self.dirty);
    }

    /// Write the value to the slow tier. On success the dirty flag clears
    /// and the last-sync timestamp advances (and is persisted to the fast
    /// tier); on failure the entity stays dirty and the timestamp is
    /// untouched, so a later sweep retries.
    pub async fn flush(&mut self, slow: &StorageAdapter, local: &StorageAdapter) -> Result<(), StorageError> {
        match slow.set(self.key, &self.value).await {
            Ok(()) => {
                self.dirty = false;
                self.last_sync_ms = epoch_ms();
                if let Err(error) = local.set(self.sync_time_key, &self.last_sync_ms).await {
                    debug!(entity = self.label, %error, "could not persist last-sync timestamp");
                }
                metrics::record_flush(self.label, "success");
                metrics::set_entity_dirty(self.label, false);
                debug!(entity = self.label, "flushed to slow tier");
                Ok(())
            }
            Err(error) => {
                metrics::record_flush(self.label, "error");
                Err(error)
            }
        }
    }

    /// Flush only when dirty. Returns whether a flush happened.
    pub async fn flush_if_dirty(
        &mut self,
        slow: &StorageAdapter,
        local: &StorageAdapter,
    ) -> Result<bool, StorageError> {
        if !self.dirty {
            return Ok(false);
        }
        self.flush(slow, local).await?;
        Ok(true)
    }
}
