//! Typed JSON adapter over a storage tier.
//!
//! Reads are total: a missing or malformed key yields the caller-supplied
//! default (logged, never raised), so corrupt persisted data can never take
//! down a caller. Writes and removes propagate tier failures — the caller
//! decides whether to retry, but the in-memory value is never touched.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::traits::{StorageError, StorageTier};

/// Uniform read/write/delete against one named tier.
#[derive(Clone)]
pub struct StorageAdapter {
    tier: Arc<dyn StorageTier>,
    name: &'static str,
}

impl StorageAdapter {
    pub fn new(name: &'static str, tier: Arc<dyn StorageTier>) -> Self {
        Self { tier, name }
    }

    /// Tier name for logs and metrics ("local" / "sync").
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read and decode, treating read failure and malformed data as absence.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.tier.get_raw(key).await {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(error) => {
                    warn!(tier = self.name, key, %error, "discarding malformed stored value");
                    None
                }
            },
            Ok(_) => None,
            Err(error) => {
                warn!(tier = self.name, key, %error, "storage read failed, treating key as absent");
                None
            }
        }
    }

    /// [`try_get`](Self::try_get) with a fallback value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.try_get(key).await.unwrap_or(default)
    }

    /// Raw presence check that propagates backend errors, for callers that
    /// must distinguish "absent" from "tier down" (the migration gate).
    pub async fn check(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self
            .tier
            .get_raw(key)
            .await?
            .is_some_and(|raw| !raw.is_empty()))
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.tier.set_raw(key, &raw).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.tier.remove_raw(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryTier;

    fn adapter() -> (Arc<MemoryTier>, StorageAdapter) {
        let tier = Arc::new(MemoryTier::new());
        (tier.clone(), StorageAdapter::new("local", tier))
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_, adapter) = adapter();
        adapter.set("key", &vec!["600000"]).await.unwrap();
        let value: Vec<String> = adapter.get("key", Vec::new()).await;
        assert_eq!(value, vec!["600000"]);
    }

    #[tokio::test]
    async fn test_missing_key_yields_default() {
        let (_, adapter) = adapter();
        let value: Vec<String> = adapter.get("missing", vec!["fallback".into()]).await;
        assert_eq!(value, vec!["fallback"]);
    }

    #[tokio::test]
    async fn test_malformed_value_yields_default() {
        let (tier, adapter) = adapter();
        tier.insert_raw("key", "{not json");
        let value: u64 = adapter.get("key", 7).await;
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_wrong_shape_yields_default() {
        let (tier, adapter) = adapter();
        tier.insert_raw("key", r#"{"a": 1}"#);
        let value: Vec<String> = adapter.get("key", Vec::new()).await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_yields_default() {
        let (tier, adapter) = adapter();
        adapter.set("key", &1u64).await.unwrap();
        tier.set_fail_reads(true);
        let value: u64 = adapter.get("key", 0).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let (tier, adapter) = adapter();
        tier.set_fail_writes(true);
        assert!(adapter.set("key", &1u64).await.is_err());
        assert!(adapter.remove("key").await.is_err());
    }

    #[tokio::test]
    async fn test_check_distinguishes_absence_from_failure() {
        let (tier, adapter) = adapter();
        assert!(!adapter.check("key").await.unwrap());
        adapter.set("key", &1u64).await.unwrap();
        assert!(adapter.check("key").await.unwrap());
        tier.set_fail_reads(true);
        assert!(adapter.check("key").await.is_err());
    }

    #[tokio::test]
    async fn test_remove() {
        let (_, adapter) = adapter();
        adapter.set("key", &1u64).await.unwrap();
        adapter.remove("key").await.unwrap();
        assert!(!adapter.check("key").await.unwrap());
    }
}
