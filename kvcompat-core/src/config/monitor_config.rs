use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Alert monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between evaluation ticks.
    pub interval_secs: u64,
    /// Seconds a resolved alert stays in the active set before it is swept.
    pub resolved_grace_secs: u64,
    /// Maximum history entries kept in memory. Oldest entries are dropped first.
    pub history_capacity: usize,
    /// Number of most-affected methods reported by the daily stats.
    pub today_top_methods: usize,
    /// Upper bound on a single subscriber's delivery, in milliseconds.
    pub delivery_timeout_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::DEFAULT_MONITOR_INTERVAL_SECS,
            resolved_grace_secs: defaults::DEFAULT_RESOLVED_GRACE_SECS,
            history_capacity: defaults::DEFAULT_HISTORY_CAPACITY,
            today_top_methods: defaults::DEFAULT_TODAY_TOP_METHODS,
            delivery_timeout_ms: defaults::DEFAULT_DELIVERY_TIMEOUT_MS,
        }
    }
}

impl MonitorConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}
