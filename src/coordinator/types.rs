//! Public types for the watch store coordinator.

/// Store lifecycle state.
///
/// The store progresses through states during startup and shutdown.
/// Use [`super::WatchStore::state()`] to check the current state or
/// [`super::WatchStore::state_receiver()`] to watch for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Just created, not yet initialized
    Created,
    /// Hydrating entities from storage
    Loading,
    /// Converting legacy-schema data (first run only)
    Migrating,
    /// Serving reads and mutations
    Ready,
    /// Final flush in progress
    ShuttingDown,
}

impl std::fmt::Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Loading => write!(f, "Loading"),
            Self::Migrating => write!(f, "Migrating"),
            Self::Ready => write!(f, "Ready"),
            Self::ShuttingDown => write!(f, "ShuttingDown"),
        }
    }
}

/// Result of one sweep over the managed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Entities that needed a slow-tier write
    pub attempted: usize,
    /// Entities flushed successfully
    pub flushed: usize,
    /// Entities whose flush failed and stay dirty
    pub failed: usize,
}

impl SweepReport {
    /// Check that no flush failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for SweepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "attempted={} flushed={} failed={}",
            self.attempted, self.flushed, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_state_display() {
        assert_eq!(format!("{}", StoreState::Created), "Created");
        assert_eq!(format!("{}", StoreState::Migrating), "Migrating");
        assert_eq!(format!("{}", StoreState::ShuttingDown), "ShuttingDown");
    }

    #[test]
    fn test_sweep_report_is_clean() {
        let clean = SweepReport { attempted: 2, flushed: 2, failed: 0 };
        assert!(clean.is_clean());

        let failed = SweepReport { attempted: 2, flushed: 1, failed: 1 };
        assert!(!failed.is_clean());
    }

    #[test]
    fn test_sweep_report_display() {
        let report = SweepReport { attempted: 2, flushed: 1, failed: 1 };
        assert_eq!(format!("{report}"), "attempted=2 flushed=1 failed=1");
    }
}
