use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("both storage tiers unavailable")]
    AllTiersDown,
}

/// The seam to the host platform's key-value storage service.
///
/// Two instances back a [`WatchStore`](crate::WatchStore): a fast tier
/// private to one installation and a slow tier replicated across the user's
/// devices. Values are opaque text at this level; (de)serialization happens
/// in [`StorageAdapter`](super::StorageAdapter). Every call is fallible —
/// the platform may reject with quota or rate errors at any time.
#[async_trait]
pub trait StorageTier: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_raw(&self, key: &str) -> Result<(), StorageError>;
}
