use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::traits::{StorageError, StorageTier};

/// In-memory storage tier.
///
/// Stands in for the platform's key-value service in tests and embedded use.
/// Failure injection simulates the quota/rate rejections a real slow tier
/// produces, and per-key write counts let tests assert the throttle bound.
pub struct MemoryTier {
    data: DashMap<String, String>,
    write_counts: DashMap<String, usize>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryTier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            write_counts: DashMap::new(),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&self) {
        self.data.clear();
        self.write_counts.clear();
    }

    /// Make subsequent writes/removes fail with a backend error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Make subsequent reads fail with a backend error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Release);
    }

    /// Number of successful writes this tier has seen for `key`.
    #[must_use]
    pub fn write_count(&self, key: &str) -> usize {
        self.write_counts.get(key).map_or(0, |c| *c)
    }

    /// Peek the raw stored text without going through the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.get(key).map(|r| r.value().clone())
    }

    /// Seed a raw value directly, bypassing counters (test setup).
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageTier for MemoryTier {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::Acquire) {
            return Err(StorageError::Backend("injected read failure".to_string()));
        }
        Ok(self.data.get(key).map(|r| r.value().clone()))
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StorageError::Backend("injected write failure".to_string()));
        }
        self.data.insert(key.to_string(), value.to_string());
        *self.write_counts.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn remove_raw(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StorageError::Backend("injected write failure".to_string()));
        }
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_tier_is_empty() {
        let tier = MemoryTier::new();
        assert!(tier.is_empty());
        assert_eq!(tier.len(), 0);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let tier = MemoryTier::new();
        tier.set_raw("key", "value").await.unwrap();
        assert_eq!(tier.get_raw("key").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let tier = MemoryTier::new();
        assert!(tier.get_raw("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let tier = MemoryTier::new();
        tier.set_raw("key", "value").await.unwrap();
        tier.remove_raw("key").await.unwrap();
        assert!(tier.get_raw("key").await.unwrap().is_none());
        // Removing a missing key is fine
        tier.remove_raw("key").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_counts() {
        let tier = MemoryTier::new();
        assert_eq!(tier.write_count("key"), 0);
        tier.set_raw("key", "a").await.unwrap();
        tier.set_raw("key", "b").await.unwrap();
        assert_eq!(tier.write_count("key"), 2);
        // Seeding bypasses the counter
        tier.insert_raw("other", "x");
        assert_eq!(tier.write_count("other"), 0);
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let tier = MemoryTier::new();
        tier.set_fail_writes(true);
        assert!(tier.set_raw("key", "value").await.is_err());
        assert!(tier.remove_raw("key").await.is_err());
        tier.set_fail_writes(false);
        tier.set_raw("key", "value").await.unwrap();
    }

    #[tokio::test]
    async fn test_injected_read_failure() {
        let tier = MemoryTier::new();
        tier.set_raw("key", "value").await.unwrap();
        tier.set_fail_reads(true);
        assert!(tier.get_raw("key").await.is_err());
    }
}
