//! Configuration for the watch store.
//!
//! # Example
//!
//! ```
//! use watchlist_sync::StoreConfig;
//!
//! // Minimal config (uses defaults)
//! let config = StoreConfig::default();
//! assert_eq!(config.throttle_window_ms, 30_000);
//!
//! // Full config
//! let config = StoreConfig {
//!     throttle_window_ms: 10_000,
//!     sweep_interval_ms: 30_000,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the watch store.
///
/// All fields have sensible defaults; a host typically only tunes the
/// throttle window and sweep interval to fit its platform's rate limits.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Minimum interval between slow-tier writes for the same entity
    /// (default: 30 s)
    #[serde(default = "default_throttle_window_ms")]
    pub throttle_window_ms: u64,

    /// Period of the dirty-entity sweep driven by [`run_periodic`]
    /// (default: 60 s)
    ///
    /// [`run_periodic`]: crate::WatchStore::run_periodic
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Display name for the group synthesized on first run or migration
    #[serde(default = "default_group_name")]
    pub default_group_name: String,

    /// Buffer capacity of the cross-context notification channel
    #[serde(default = "default_notify_capacity")]
    pub notify_capacity: usize,
}

fn default_throttle_window_ms() -> u64 { 30_000 }
fn default_sweep_interval_ms() -> u64 { 60_000 }
fn default_group_name() -> String { "Watchlist".to_string() }
fn default_notify_capacity() -> usize { 16 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            throttle_window_ms: default_throttle_window_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            default_group_name: default_group_name(),
            notify_capacity: default_notify_capacity(),
        }
    }
}
