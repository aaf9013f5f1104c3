//! Dirty-entity sweeps.
//!
//! The sweep is the guarantee behind the throttle: a deferred or failed
//! flush is always retried here, so a dirty entity with no further
//! mutations still reaches the slow tier. Entities are flushed
//! concurrently and failures are isolated — one entity's storage trouble
//! never blocks or fails the sweep for the others.

use tracing::{debug, warn};

use super::{SweepReport, WatchStore};
use crate::metrics;

impl WatchStore {
    /// Flush every dirty entity, ignoring the throttle window.
    ///
    /// The periodic entry point for the host's timer facility, also usable
    /// on demand.
    #[tracing::instrument(skip(self))]
    pub async fn periodic_sync(&self) -> SweepReport {
        let (groups, badge) = tokio::join!(self.sweep_groups(), self.sweep_badge());

        let mut report = SweepReport::default();
        for outcome in [groups, badge] {
            match outcome {
                None => {}
                Some(true) => {
                    report.attempted += 1;
                    report.flushed += 1;
                }
                Some(false) => {
                    report.attempted += 1;
                    report.failed += 1;
                }
            }
        }
        metrics::record_sweep(report.flushed, report.failed);
        if report.attempted > 0 {
            debug!(%report, "sweep completed");
        }
        report
    }

    /// Flush every entity unconditionally, dirty or not — bypasses both
    /// the throttle and the dirty check. Used at shutdown and when the
    /// host wants the slow tier re-mirrored right now.
    #[tracing::instrument(skip(self))]
    pub async fn force_sync_all(&self) -> SweepReport {
        let (groups, badge) = tokio::join!(
            async {
                let mut entity = self.groups.lock().await;
                entity.flush(&self.slow, &self.local).await
            },
            async {
                let mut entity = self.badge.lock().await;
                entity.flush(&self.slow, &self.local).await
            },
        );

        let mut report = SweepReport {
            attempted: 2,
            ..SweepReport::default()
        };
        for (entity, outcome) in [("groups", groups), ("badge", badge)] {
            match outcome {
                Ok(()) => report.flushed += 1,
                Err(error) => {
                    warn!(entity, %error, "forced flush failed");
                    report.failed += 1;
                }
            }
        }
        metrics::record_sweep(report.flushed, report.failed);
        report
    }

    async fn sweep_groups(&self) -> Option<bool> {
        let mut entity = self.groups.lock().await;
        match entity.flush_if_dirty(&self.slow, &self.local).await {
            Ok(false) => None,
            Ok(true) => Some(true),
            Err(error) => {
                warn!(entity = "groups", %error, "sweep flush failed, will retry next sweep");
                Some(false)
            }
        }
    }

    async fn sweep_badge(&self) -> Option<bool> {
        let mut entity = self.badge.lock().await;
        match entity.flush_if_dirty(&self.slow, &self.local).await {
            Ok(false) => None,
            Ok(true) => Some(true),
            Err(error) => {
                warn!(entity = "badge", %error, "sweep flush failed, will retry next sweep");
                Some(false)
            }
        }
    }
}
