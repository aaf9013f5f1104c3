// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for watchlist-sync.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host is responsible for choosing the exporter.
//!
//! # Metric Naming Convention
//! - `watchlist_sync_` prefix for all metrics
//! - `_total` suffix for counters
//!
//! # Labels
//! - `entity`: groups, badge
//! - `status`: success, error

use metrics::{counter, gauge};

/// Record a fast-tier write-through outcome
pub fn record_local_write(entity: &str, status: &str) {
    counter!(
        "watchlist_sync_local_writes_total",
        "entity" => entity.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a slow-tier flush outcome
pub fn record_flush(entity: &str, status: &str) {
    counter!(
        "watchlist_sync_flushes_total",
        "entity" => entity.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a flush deferred by the throttle window
pub fn record_flush_deferred(entity: &str) {
    counter!(
        "watchlist_sync_flushes_deferred_total",
        "entity" => entity.to_string()
    )
    .increment(1);
}

/// Record a sweep pass over the dirty entities
pub fn record_sweep(flushed: usize, failed: usize) {
    counter!("watchlist_sync_sweeps_total").increment(1);
    counter!("watchlist_sync_sweep_flushes_total").increment(flushed as u64);
    counter!("watchlist_sync_sweep_failures_total").increment(failed as u64);
}

/// Record a completed legacy migration, labeled by source tier
/// ("local", "sync") or "defaults" when no legacy data was found
pub fn record_migration(source: &str) {
    counter!(
        "watchlist_sync_migrations_total",
        "source" => source.to_string()
    )
    .increment(1);
}

/// Record a cross-context notification broadcast
pub fn record_notification() {
    counter!("watchlist_sync_notifications_total").increment(1);
}

/// Set an entity's dirty state (1 = dirty)
pub fn set_entity_dirty(entity: &str, dirty: bool) {
    gauge!(
        "watchlist_sync_entity_dirty",
        "entity" => entity.to_string()
    )
    .set(if dirty { 1.0 } else { 0.0 });
}
