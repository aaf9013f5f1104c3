// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Time-window throttle for slow-tier writes.
//!
//! The scheduler decides when a dirty entity's slow-tier write actually
//! fires. Policy: if more than one window has elapsed since the entity's
//! last successful sync, flush immediately; otherwise leave the entity
//! dirty and defer. A deferred entity is picked up either by a later
//! `request_sync` that finds the window elapsed, or by the coordinator's
//! periodic sweep — so a dirty entity with no further mutations is still
//! flushed eventually.
//!
//! This bounds slow-tier traffic to at most one write per entity per
//! window while guaranteeing no mutation is permanently dropped. The
//! throttle state is the entity's persisted last-sync timestamp, not a
//! timer callback, so it survives the owning context being suspended.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::entity::{epoch_ms, SyncedEntity};
use crate::metrics;
use crate::storage::StorageAdapter;

/// Outcome of a [`SyncScheduler::request_sync`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Entity was clean, nothing to do
    Clean,
    /// Window elapsed, flush succeeded
    Flushed,
    /// Window still open, entity left dirty for a later pass
    Deferred,
    /// Window elapsed but the slow tier rejected the write; entity stays
    /// dirty and the timestamp is not advanced, so the sweep retries
    Failed,
}

/// Per-call throttle over an entity's persisted last-sync timestamp.
#[derive(Debug, Clone, Copy)]
pub struct SyncScheduler {
    window: Duration,
}

impl SyncScheduler {
    #[must_use]
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a flush is due for an entity last synced at `last_sync_ms`.
    ///
    /// An entity that has never synced (`last_sync_ms == 0`) is always due.
    #[must_use]
    pub fn window_elapsed(&self, last_sync_ms: u64) -> bool {
        epoch_ms().saturating_sub(last_sync_ms) >= self.window.as_millis() as u64
    }

    /// Flush the entity now if its window has elapsed, otherwise defer.
    pub async fn request_sync<T>(
        &self,
        entity: &mut SyncedEntity<T>,
        slow: &StorageAdapter,
        local: &StorageAdapter,
    ) -> SyncDecision
    where
        T: Serialize + DeserializeOwned + Send,
    {
        if !entity.is_dirty() {
            return SyncDecision::Clean;
        }
        if !self.window_elapsed(entity.last_sync_ms()) {
            debug!(entity = entity.label(), "throttle window open, deferring slow-tier flush");
            metrics::record_flush_deferred(entity.label());
            return SyncDecision::Deferred;
        }
        match entity.flush(slow, local).await {
            Ok(()) => SyncDecision::Flushed,
            Err(error) => {
                warn!(
                    entity = entity.label(),
                    %error,
                    "slow-tier flush failed, entity stays dirty for sweep retry"
                );
                SyncDecision::Failed
            }
        }
    }
}
