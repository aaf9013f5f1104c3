//! Cross-context notifications.
//!
//! A fire-and-forget broadcast with a fixed tag and no reply: the popup
//! context announces a badge change, the background context refreshes the
//! icon. Receivers must treat redundant messages as harmless — delivery is
//! at-most-once per subscriber and never acknowledged.

use tokio::sync::broadcast;
use tracing::debug;

use crate::metrics;

/// One-way message broadcast between host contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The badge selection changed; re-render the toolbar icon.
    UpdateBadge,
}

/// Broadcast sender shared by all store handles in a context.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Fire and forget. Having no live receivers is not an error.
    pub fn notify(&self, notification: Notification) {
        metrics::record_notification();
        if self.tx.send(notification).is_err() {
            debug!(?notification, "notification dropped, no live receivers");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.notify(Notification::UpdateBadge);

        assert_eq!(rx.recv().await.unwrap(), Notification::UpdateBadge);
    }

    #[tokio::test]
    async fn test_no_receivers_is_harmless() {
        let notifier = Notifier::default();
        notifier.notify(Notification::UpdateBadge);
    }

    #[tokio::test]
    async fn test_redundant_messages_all_delivered() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.notify(Notification::UpdateBadge);
        notifier.notify(Notification::UpdateBadge);

        assert_eq!(rx.recv().await.unwrap(), Notification::UpdateBadge);
        assert_eq!(rx.recv().await.unwrap(), Notification::UpdateBadge);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let notifier = Notifier::default();
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();

        notifier.notify(Notification::UpdateBadge);

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }
}
