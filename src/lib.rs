//! # Watchlist Sync
//!
//! A persisted-state synchronization engine for watchlist trackers.
//!
//! ## Architecture
//!
//! The engine keeps user state consistent across two storage tiers of very
//! different characteristics:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Domain Operations                      │
//! │  • Group CRUD, ticker add/remove/move, badge selection      │
//! │  • Applied to the in-memory entity value first              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (synchronous write-through)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Fast Tier ("local")                        │
//! │  • Low latency, private to one installation                 │
//! │  • Written on every mutation, unconditionally               │
//! │  • Authoritative hand-off point between host contexts       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               (throttled flush / periodic sweep)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Slow Tier ("sync")                         │
//! │  • Replicated across the user's devices by the host         │
//! │  • Quota and call-rate limited, every call fallible         │
//! │  • At most one write per entity per throttle window         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations always land in memory and the fast tier before the call returns;
//! the slow tier is updated eventually, under a time-window throttle, with
//! failed flushes retried by the periodic sweep. A dirty entity is never
//! dropped: either a later mutation or the sweep carries it to the slow tier.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use watchlist_sync::{MemoryTier, StoreConfig, WatchStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     // In production the host supplies its platform storage tiers;
//!     // MemoryTier works for tests and embedding.
//!     let store = WatchStore::new(
//!         StoreConfig::default(),
//!         Arc::new(MemoryTier::new()),
//!         Arc::new(MemoryTier::new()),
//!     );
//!
//!     store.initialize().await.expect("storage unavailable");
//!
//!     store.add_ticker("sh600000").await.expect("valid ticker");
//!     store.set_badge("600000").await.expect("valid ticker");
//!
//!     // Host timer facility drives the sweep.
//!     let report = store.periodic_sync().await;
//!     println!("sweep: {report}");
//! }
//! ```
//!
//! ## Features
//!
//! - **Write-through durability**: every mutation is persisted to the fast
//!   tier before the mutating call returns
//! - **Throttled slow-tier writes**: at most one flush per entity per window
//! - **Self-healing load**: a fresh device adopts slow-tier state and repairs
//!   its fast tier
//! - **One-shot schema migration**: legacy flat watchlists are converted to
//!   the group schema exactly once
//! - **Failure isolation**: a failing entity never blocks the sweep for the
//!   others
//!
//! ## Modules
//!
//! - [`coordinator`]: the [`WatchStore`] orchestrating entities, scheduler
//!   and migration
//! - [`entity`]: the dirty-tracked entity pattern
//! - [`scheduler`]: the time-window throttle
//! - [`storage`]: the tier seam and the typed JSON adapter
//! - [`migration`]: legacy schema resolution
//! - [`group`], [`ticker`]: the domain model

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod group;
pub mod metrics;
pub mod migration;
pub mod notify;
pub mod scheduler;
pub mod storage;
pub mod ticker;

pub use config::StoreConfig;
pub use coordinator::{StoreState, SweepReport, WatchStore};
pub use entity::SyncedEntity;
pub use error::StoreError;
pub use group::{Group, GroupsState, DEFAULT_GROUP_ID};
pub use notify::{Notification, Notifier};
pub use scheduler::{SyncDecision, SyncScheduler};
pub use storage::{MemoryTier, StorageAdapter, StorageError, StorageTier};
