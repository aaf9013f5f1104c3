// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Watch store coordinator.
//!
//! The [`WatchStore`] is the process-wide entry point that ties together
//! the synchronized entities, the throttle scheduler, the migration
//! resolver and the cross-context notifier. One instance exists per host
//! context (popup, background); instances in different contexts share
//! durable storage, not memory, with the fast tier as the hand-off point.
//!
//! # Lifecycle
//!
//! ```text
//! Created → Loading → [Migrating] → Ready → ShuttingDown
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use watchlist_sync::{MemoryTier, StoreConfig, StoreState, WatchStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = WatchStore::new(
//!     StoreConfig::default(),
//!     Arc::new(MemoryTier::new()),
//!     Arc::new(MemoryTier::new()),
//! );
//! assert_eq!(store.state(), StoreState::Created);
//!
//! store.initialize().await.expect("storage unavailable");
//! assert!(store.is_ready());
//! # }
//! ```

mod badge_api;
mod groups_api;
mod lifecycle;
mod sweep;
mod types;

pub use types::{StoreState, SweepReport};

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};

use crate::config::StoreConfig;
use crate::entity::SyncedEntity;
use crate::group::{Group, GroupsState};
use crate::notify::Notifier;
use crate::scheduler::SyncScheduler;
use crate::storage::{StorageAdapter, StorageTier};

/// Current-schema key for the groups entity (both tiers).
pub const GROUPS_KEY: &str = "stockGroups";
/// Key for the badge selection (both tiers).
pub const BADGE_KEY: &str = "badgeStock";
/// Last successful groups sync, epoch millis (fast tier only).
pub const GROUPS_SYNC_TIME_KEY: &str = "lastGroupsSyncTime";
/// Last successful badge sync, epoch millis (fast tier only).
pub const BADGE_SYNC_TIME_KEY: &str = "lastBadgeSyncTime";

/// Process-wide watch store.
///
/// Thread-safe: entities sit behind async mutexes, so the store can be
/// shared across tasks via `Arc`. Within one entity, a mutation and its
/// fast-tier write-through are never interleaved with another mutation.
pub struct WatchStore {
    /// Runtime-tunable configuration (read-mostly)
    config: RwLock<StoreConfig>,

    /// Fast tier: private to this installation
    local: StorageAdapter,

    /// Slow tier: replicated across the user's devices, rate-limited
    slow: StorageAdapter,

    /// Watchlist groups and the current-group selection
    groups: Mutex<SyncedEntity<GroupsState>>,

    /// Badge ticker selection ("" = no badge)
    badge: Mutex<SyncedEntity<String>>,

    /// Cross-context change notifications
    notifier: Notifier,

    /// Lifecycle state (broadcast to watchers)
    state: watch::Sender<StoreState>,
    state_rx: watch::Receiver<StoreState>,

    /// Disambiguates group ids created within the same millisecond
    id_seq: AtomicU64,
}

impl WatchStore {
    pub fn new(
        config: StoreConfig,
        local: Arc<dyn StorageTier>,
        slow: Arc<dyn StorageTier>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(StoreState::Created);
        let notifier = Notifier::new(config.notify_capacity);
        let groups = SyncedEntity::new(
            "groups",
            GROUPS_KEY,
            GROUPS_SYNC_TIME_KEY,
            GroupsState::with_default_group(&config.default_group_name),
        );
        let badge = SyncedEntity::new("badge", BADGE_KEY, BADGE_SYNC_TIME_KEY, String::new());

        Self {
            config: RwLock::new(config),
            local: StorageAdapter::new("local", local),
            slow: StorageAdapter::new("sync", slow),
            groups: Mutex::new(groups),
            badge: Mutex::new(badge),
            notifier,
            state: state_tx,
            state_rx,
            id_seq: AtomicU64::new(0),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        *self.state_rx.borrow()
    }

    /// Watch lifecycle state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<StoreState> {
        self.state_rx.clone()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == StoreState::Ready
    }

    /// The notifier carrying [`UpdateBadge`](crate::Notification::UpdateBadge)
    /// broadcasts; the background context subscribes to it.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Adjust the throttle window at runtime.
    pub fn set_throttle_window_ms(&self, window_ms: u64) {
        self.config.write().throttle_window_ms = window_ms;
    }

    pub(crate) fn scheduler(&self) -> SyncScheduler {
        SyncScheduler::new(self.config.read().throttle_window_ms)
    }

    // --- Read API ---

    /// Snapshot of all groups, in display order.
    pub async fn groups(&self) -> Vec<Group> {
        self.groups.lock().await.value().groups.clone()
    }

    pub async fn current_group_id(&self) -> String {
        self.groups.lock().await.value().current_group_id.clone()
    }

    /// Codes of one group, in user order.
    pub async fn group_stocks(&self, id: &str) -> Option<Vec<String>> {
        self.groups
            .lock()
            .await
            .value()
            .group(id)
            .map(|g| g.stocks.clone())
    }

    /// Diagnostics: does the groups entity hold unflushed state?
    pub async fn groups_dirty(&self) -> bool {
        self.groups.lock().await.is_dirty()
    }

    /// Diagnostics: does the badge entity hold unflushed state?
    pub async fn badge_dirty(&self) -> bool {
        self.badge.lock().await.is_dirty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::group::DEFAULT_GROUP_ID;
    use crate::storage::MemoryTier;

    fn create_test_store() -> WatchStore {
        WatchStore::new(
            StoreConfig::default(),
            Arc::new(MemoryTier::new()),
            Arc::new(MemoryTier::new()),
        )
    }

    #[test]
    fn test_store_created_state() {
        let store = create_test_store();
        assert_eq!(store.state(), StoreState::Created);
        assert!(!store.is_ready());
    }

    #[tokio::test]
    async fn test_new_store_has_default_group() {
        let store = create_test_store();
        let groups = store.groups().await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, DEFAULT_GROUP_ID);
        assert_eq!(store.current_group_id().await, DEFAULT_GROUP_ID);
    }

    #[tokio::test]
    async fn test_new_store_is_clean() {
        let store = create_test_store();
        assert!(!store.groups_dirty().await);
        assert!(!store.badge_dirty().await);
    }

    #[test]
    fn test_set_throttle_window() {
        let store = create_test_store();
        store.set_throttle_window_ms(5_000);
        assert_eq!(store.scheduler().window().as_millis(), 5_000);
    }

    #[tokio::test]
    async fn test_group_stocks_missing_group() {
        let store = create_test_store();
        assert!(store.group_stocks("nope").await.is_none());
    }
}
