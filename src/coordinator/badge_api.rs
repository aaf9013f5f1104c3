//! Badge selection operations.
//!
//! The badge is the one ticker whose change-percent is rendered on the
//! toolbar icon. Changing it broadcasts [`Notification::UpdateBadge`] so
//! the background context refreshes immediately instead of waiting for its
//! next poll.

use super::WatchStore;
use crate::error::StoreError;
use crate::notify::Notification;
use crate::ticker;

impl WatchStore {
    /// The current badge ticker; `""` means no badge.
    pub async fn badge(&self) -> String {
        self.badge.lock().await.value().clone()
    }

    /// Select the badge ticker. The code is normalized to its prefix-free
    /// form; `""` clears the badge. Always broadcasts `UpdateBadge` — the
    /// receiving handler is idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn set_badge(&self, code: &str) -> Result<(), StoreError> {
        let code = if code.trim().is_empty() {
            String::new()
        } else {
            let normalized = ticker::normalize(code);
            if !ticker::is_valid(&normalized) {
                return Err(StoreError::InvalidTicker(code.to_string()));
            }
            normalized
        };
        {
            let mut badge = self.badge.lock().await;
            // Re-selecting the current badge costs no write
            if badge.value() != &code {
                badge.replace(&self.local, code).await;
                self.scheduler()
                    .request_sync(&mut badge, &self.slow, &self.local)
                    .await;
            }
        }
        self.notifier.notify(Notification::UpdateBadge);
        Ok(())
    }

    /// Clear the badge only if it currently shows `code` (e.g. when that
    /// ticker is removed from the watchlist). Returns whether it cleared.
    #[tracing::instrument(skip(self))]
    pub async fn clear_badge_if(&self, code: &str) -> bool {
        let code = ticker::normalize(code);
        let cleared = {
            let mut badge = self.badge.lock().await;
            if !code.is_empty() && badge.value() == &code {
                badge.replace(&self.local, String::new()).await;
                self.scheduler()
                    .request_sync(&mut badge, &self.slow, &self.local)
                    .await;
                true
            } else {
                false
            }
        };
        if cleared {
            self.notifier.notify(Notification::UpdateBadge);
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::StoreConfig;
    use crate::error::StoreError;
    use crate::notify::Notification;
    use crate::storage::MemoryTier;
    use crate::WatchStore;

    async fn ready_store() -> WatchStore {
        let store = WatchStore::new(
            StoreConfig::default(),
            Arc::new(MemoryTier::new()),
            Arc::new(MemoryTier::new()),
        );
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_set_badge_normalizes() {
        let store = ready_store().await;
        store.set_badge("sh600000").await.unwrap();
        assert_eq!(store.badge().await, "600000");
    }

    #[tokio::test]
    async fn test_set_badge_rejects_garbage() {
        let store = ready_store().await;
        assert!(matches!(
            store.set_badge("not-a-code").await,
            Err(StoreError::InvalidTicker(_))
        ));
        assert_eq!(store.badge().await, "");
    }

    #[tokio::test]
    async fn test_set_badge_empty_clears() {
        let store = ready_store().await;
        store.set_badge("600000").await.unwrap();
        store.set_badge("").await.unwrap();
        assert_eq!(store.badge().await, "");
    }

    #[tokio::test]
    async fn test_set_badge_notifies() {
        let store = ready_store().await;
        let mut rx = store.notifier().subscribe();
        store.set_badge("600000").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), Notification::UpdateBadge);
    }

    #[tokio::test]
    async fn test_clear_badge_if_matches() {
        let store = ready_store().await;
        store.set_badge("600000").await.unwrap();

        assert!(!store.clear_badge_if("000001").await);
        assert_eq!(store.badge().await, "600000");

        assert!(store.clear_badge_if("sh600000").await);
        assert_eq!(store.badge().await, "");
    }

    #[tokio::test]
    async fn test_clear_badge_if_on_empty_badge() {
        let store = ready_store().await;
        assert!(!store.clear_badge_if("600000").await);
    }
}
