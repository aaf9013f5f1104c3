//! Store lifecycle management: initialize, reload, sweep loop, shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::{StoreState, WatchStore, GROUPS_KEY};
use crate::metrics;
use crate::migration;
use crate::storage::StorageError;

impl WatchStore {
    /// Initialize the store: run the one-shot migration check, then hydrate
    /// both entities from storage.
    ///
    /// Startup flow:
    /// 1. Probe both tiers for the current-schema key
    /// 2. Key present anywhere → load (fast tier first, self-healing from
    ///    the slow tier), repairing invariants in foreign data
    /// 3. Key absent from both tiers → migrate: recover legacy codes,
    ///    synthesize the group state, persist it, purge the legacy key
    /// 4. Hydrate the badge entity
    ///
    /// Storage trouble on one tier degrades gracefully; only both tiers
    /// failing the probe is an initialization error.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let _ = self.state.send(StoreState::Loading);
        info!("initializing watch store");

        let local_present = self.local.check(GROUPS_KEY).await;
        let slow_present = self.slow.check(GROUPS_KEY).await;
        if local_present.is_err() && slow_present.is_err() {
            error!("both storage tiers failed the schema probe");
            let _ = self.state.send(StoreState::Created);
            return Err(StorageError::AllTiersDown);
        }
        let degraded = local_present.is_err() || slow_present.is_err();
        let present = local_present.unwrap_or(false) || slow_present.unwrap_or(false);

        let default_name = self.config.read().default_group_name.clone();

        if present || degraded {
            if degraded {
                // A tier that cannot answer the probe might still hold the
                // current schema; loading is safe either way, migrating is not.
                warn!("one storage tier unavailable, skipping migration check");
            }
            let mut groups = self.groups.lock().await;
            groups.load(&self.local, &self.slow).await;
            let mut repaired = groups.value().clone();
            if repaired.repair(&default_name) {
                warn!("stored group state violated invariants, repaired");
                groups.replace(&self.local, repaired).await;
            }
        } else {
            let _ = self.state.send(StoreState::Migrating);
            self.migrate_legacy(&default_name).await;
        }

        {
            let mut badge = self.badge.lock().await;
            badge.load(&self.local, &self.slow).await;
        }

        let _ = self.state.send(StoreState::Ready);
        info!("watch store ready");
        Ok(())
    }

    /// One-shot conversion of pre-group watchlist data.
    async fn migrate_legacy(&self, default_name: &str) {
        let mut groups = self.groups.lock().await;
        let fetched = migration::fetch_legacy_codes(&self.local, &self.slow).await;
        let source = fetched.as_ref().map(|(_, source)| *source);
        let codes = fetched.map(|(codes, _)| codes).unwrap_or_default();
        let recovered = codes.len();

        let state = migration::synthesize_groups(codes, default_name);
        groups.replace(&self.local, state).await;
        let decision = self
            .scheduler()
            .request_sync(&mut groups, &self.slow, &self.local)
            .await;
        debug!(?decision, "migrated group state handed to scheduler");

        match source {
            Some(source) => {
                migration::purge_legacy(&self.local, &self.slow).await;
                metrics::record_migration(source);
                info!(source, recovered, "legacy watchlist migrated to group schema");
            }
            None => {
                metrics::record_migration("defaults");
                debug!("no legacy watchlist found, starting from defaults");
            }
        }
    }

    /// Re-adopt persisted state this context did not write itself.
    ///
    /// The background context calls this before reading, since the
    /// foreground context mutates the same keys through its own store
    /// instance — the fast tier, not memory, is the hand-off point.
    pub async fn reload(&self) {
        {
            let mut groups = self.groups.lock().await;
            groups.load(&self.local, &self.slow).await;
        }
        {
            let mut badge = self.badge.lock().await;
            badge.load(&self.local, &self.slow).await;
        }
        debug!("entities reloaded from storage");
    }

    /// Drive the periodic sweep until `shutdown` signals `true` (or its
    /// sender is dropped). Missed ticks are skipped rather than bunched,
    /// so a suspended context does not replay a backlog of sweeps on
    /// resume.
    pub async fn run_periodic(&self, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_millis(self.config.read().sweep_interval_ms.max(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // An interval's first tick fires immediately; the sweep should not
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.periodic_sync().await;
                    if !report.is_clean() {
                        warn!(%report, "sweep left dirty entities behind");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("periodic sweep loop stopped");
    }

    /// Final flush before the owning context is torn down.
    pub async fn shutdown(&self) {
        let _ = self.state.send(StoreState::ShuttingDown);
        let report = self.force_sync_all().await;
        info!(%report, "watch store shut down");
    }
}
