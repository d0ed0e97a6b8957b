//! Auto-save configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default minimum time between two automatic checkpoint writes.
pub const DEFAULT_MIN_INTERVAL_SECS: u64 = 30;

/// Configuration for auto-save behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether auto-save is enabled.
    pub enabled: bool,

    /// Minimum seconds between two checkpoint writes.
    ///
    /// Attempts inside the window are skipped, not delayed.
    pub min_interval_secs: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled auto-save config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// The throttle window as a duration.
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }
}
