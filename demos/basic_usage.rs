//! Basic usage of the watch store.
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use watchlist_sync::{MemoryTier, Notification, StoreConfig, WatchStore, DEFAULT_GROUP_ID};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchlist_sync=debug".into()),
        )
        .init();

    // The host normally supplies its platform storage tiers here.
    let config = StoreConfig {
        throttle_window_ms: 2_000,
        sweep_interval_ms: 1_000,
        ..Default::default()
    };
    let store = Arc::new(WatchStore::new(
        config,
        Arc::new(MemoryTier::new()),
        Arc::new(MemoryTier::new()),
    ));

    store.initialize().await.expect("storage unavailable");

    // A background context would subscribe like this to refresh the icon.
    let mut badge_events = store.notifier().subscribe();
    tokio::spawn(async move {
        while let Ok(Notification::UpdateBadge) = badge_events.recv().await {
            println!("badge changed, refreshing icon");
        }
    });

    // Host timer facility: drive the periodic sweep until shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = {
        let store = store.clone();
        tokio::spawn(async move { store.run_periodic(shutdown_rx).await })
    };

    // Build a watchlist. Prefixed and bare codes are interchangeable.
    store.add_ticker("sh600000").await.expect("valid ticker");
    store.add_ticker("000001").await.expect("valid ticker");
    store.set_badge("600000").await.expect("valid ticker");

    let tech = store.create_group("Tech").await.expect("valid name");
    store
        .move_ticker("000001", DEFAULT_GROUP_ID, &tech)
        .await
        .expect("both groups exist");

    for group in store.groups().await {
        println!("{} ({}): {:?}", group.name, group.id, group.stocks);
    }

    // Rapid mutations coalesce; the sweep carries the rest over.
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    println!("sweep report: {}", store.periodic_sync().await);

    shutdown_tx.send(true).expect("sweeper alive");
    sweeper.await.expect("sweeper join");
    store.shutdown().await;
}
