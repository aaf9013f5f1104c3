// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Legacy schema migration.
//!
//! Early releases persisted the watchlist as a flat `stockList` value —
//! sometimes an ordered array of codes, sometimes a keyed mapping (an
//! artifact of how the host platform round-trips arrays). The resolver
//! normalizes either shape into one ordered code sequence at the storage
//! boundary, before it ever reaches domain logic.
//!
//! Migration runs once, gated on the current-schema key being absent from
//! both tiers — never on the legacy key's presence, so re-seeded legacy
//! data can't re-import after the purge.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::group::GroupsState;
use crate::storage::StorageAdapter;
use crate::ticker;

/// Pre-migration key, deleted from both tiers after conversion.
pub const LEGACY_STOCK_LIST_KEY: &str = "stockList";

/// The two on-disk shapes legacy data shows up in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyStockList {
    Ordered(Vec<Value>),
    Keyed(serde_json::Map<String, Value>),
}

impl LegacyStockList {
    /// Normalize to one ordered sequence of prefix-free codes. Keyed
    /// mappings contribute their values in enumeration order; non-string
    /// entries are dropped.
    fn into_codes(self) -> Vec<String> {
        let values: Vec<Value> = match self {
            Self::Ordered(values) => values,
            Self::Keyed(map) => map.into_iter().map(|(_, v)| v).collect(),
        };
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(code) => Some(ticker::normalize(&code)),
                _ => None,
            })
            .filter(|code| !code.is_empty())
            .collect()
    }
}

/// Locate legacy data: fast tier first, slow tier as fallback.
///
/// Returns the recovered codes and which tier supplied them, or `None`
/// when no legacy data exists (not an error — first run falls through to
/// defaults).
pub async fn fetch_legacy_codes(
    local: &StorageAdapter,
    slow: &StorageAdapter,
) -> Option<(Vec<String>, &'static str)> {
    if let Some(legacy) = local.try_get::<LegacyStockList>(LEGACY_STOCK_LIST_KEY).await {
        return Some((legacy.into_codes(), local.name()));
    }
    if let Some(legacy) = slow.try_get::<LegacyStockList>(LEGACY_STOCK_LIST_KEY).await {
        return Some((legacy.into_codes(), slow.name()));
    }
    None
}

/// Build the current-schema state: one default group holding the recovered
/// codes, or a bare default group when nothing was recovered.
#[must_use]
pub fn synthesize_groups(codes: Vec<String>, default_name: &str) -> GroupsState {
    let mut state = GroupsState::with_default_group(default_name);
    state.groups[0].stocks = codes;
    state
}

/// Delete the legacy key from both tiers. Failures are logged and left for
/// the stale key to be ignored forever — the migration gate does not depend
/// on its absence.
pub async fn purge_legacy(local: &StorageAdapter, slow: &StorageAdapter) {
    for adapter in [local, slow] {
        match adapter.remove(LEGACY_STOCK_LIST_KEY).await {
            Ok(()) => debug!(tier = adapter.name(), "legacy key purged"),
            Err(error) => {
                warn!(tier = adapter.name(), %error, "failed to purge legacy key");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::group::DEFAULT_GROUP_ID;
    use crate::storage::MemoryTier;

    fn adapters() -> (Arc<MemoryTier>, Arc<MemoryTier>, StorageAdapter, StorageAdapter) {
        let local = Arc::new(MemoryTier::new());
        let slow = Arc::new(MemoryTier::new());
        (
            local.clone(),
            slow.clone(),
            StorageAdapter::new("local", local),
            StorageAdapter::new("sync", slow),
        )
    }

    #[test]
    fn test_ordered_shape_decodes() {
        let legacy: LegacyStockList =
            serde_json::from_str(r#"["600000", "sz000001"]"#).unwrap();
        assert_eq!(legacy.into_codes(), vec!["600000", "000001"]);
    }

    #[test]
    fn test_keyed_shape_decodes_in_enumeration_order() {
        let legacy: LegacyStockList =
            serde_json::from_str(r#"{"0": "600000", "1": "000001"}"#).unwrap();
        assert_eq!(legacy.into_codes(), vec!["600000", "000001"]);
    }

    #[test]
    fn test_keyed_shape_preserves_document_order() {
        // Keys out of lexical order still enumerate as written
        let legacy: LegacyStockList =
            serde_json::from_str(r#"{"b": "000001", "a": "600000"}"#).unwrap();
        assert_eq!(legacy.into_codes(), vec!["000001", "600000"]);
    }

    #[test]
    fn test_non_string_entries_dropped() {
        let legacy: LegacyStockList =
            serde_json::from_str(r#"["600000", 42, null, "000001"]"#).unwrap();
        assert_eq!(legacy.into_codes(), vec!["600000", "000001"]);
    }

    #[test]
    fn test_synthesize_with_codes() {
        let state = synthesize_groups(vec!["600000".to_string()], "Watchlist");
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.groups[0].id, DEFAULT_GROUP_ID);
        assert_eq!(state.groups[0].stocks, vec!["600000"]);
    }

    #[test]
    fn test_synthesize_without_codes() {
        let state = synthesize_groups(Vec::new(), "Watchlist");
        assert_eq!(state.groups.len(), 1);
        assert!(state.groups[0].stocks.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_prefers_fast_tier() {
        let (local, slow, local_adapter, slow_adapter) = adapters();
        local.insert_raw(LEGACY_STOCK_LIST_KEY, r#"["600000"]"#);
        slow.insert_raw(LEGACY_STOCK_LIST_KEY, r#"["000001"]"#);

        let (codes, source) = fetch_legacy_codes(&local_adapter, &slow_adapter).await.unwrap();

        assert_eq!(codes, vec!["600000"]);
        assert_eq!(source, "local");
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_slow_tier() {
        let (_, slow, local_adapter, slow_adapter) = adapters();
        slow.insert_raw(LEGACY_STOCK_LIST_KEY, r#"{"0": "000001"}"#);

        let (codes, source) = fetch_legacy_codes(&local_adapter, &slow_adapter).await.unwrap();

        assert_eq!(codes, vec!["000001"]);
        assert_eq!(source, "sync");
    }

    #[tokio::test]
    async fn test_fetch_absent_everywhere() {
        let (_, _, local_adapter, slow_adapter) = adapters();
        assert!(fetch_legacy_codes(&local_adapter, &slow_adapter).await.is_none());
    }

    #[tokio::test]
    async fn test_purge_removes_from_both_tiers() {
        let (local, slow, local_adapter, slow_adapter) = adapters();
        local.insert_raw(LEGACY_STOCK_LIST_KEY, r#"["600000"]"#);
        slow.insert_raw(LEGACY_STOCK_LIST_KEY, r#"["600000"]"#);

        purge_legacy(&local_adapter, &slow_adapter).await;

        assert!(local.raw(LEGACY_STOCK_LIST_KEY).is_none());
        assert!(slow.raw(LEGACY_STOCK_LIST_KEY).is_none());
    }

    #[tokio::test]
    async fn test_purge_tolerates_tier_failure() {
        let (local, slow, local_adapter, slow_adapter) = adapters();
        local.insert_raw(LEGACY_STOCK_LIST_KEY, r#"["600000"]"#);
        slow.insert_raw(LEGACY_STOCK_LIST_KEY, r#"["600000"]"#);
        slow.set_fail_writes(true);

        purge_legacy(&local_adapter, &slow_adapter).await;

        assert!(local.raw(LEGACY_STOCK_LIST_KEY).is_none());
        // Slow-tier copy survives the failed remove; harmless, the gate
        // keys on the current-schema key
        assert!(slow.raw(LEGACY_STOCK_LIST_KEY).is_some());
    }
}
