//! A metrics source whose snapshot is set by the test.

use std::collections::BTreeMap;
use std::sync::Mutex;

use kvcompat_core::models::{HealthSummary, PerformanceStats};
use kvcompat_core::traits::IMetricsSource;

#[derive(Debug, Default)]
pub struct StaticMetricsSource {
    health: Mutex<HealthSummary>,
    stats: Mutex<PerformanceStats>,
}

impl StaticMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_rate(self, error_rate: f64) -> Self {
        self.health.lock().unwrap().error_rate = error_rate;
        self
    }

    pub fn with_response_time(self, ms: f64) -> Self {
        self.health.lock().unwrap().average_response_time_ms = ms;
        self
    }

    pub fn with_issues(self, issues: &[(&str, u64)]) -> Self {
        self.stats.lock().unwrap().compatibility_issues = to_map(issues);
        self
    }

    pub fn with_operations(self, counts: &[(&str, u64)]) -> Self {
        self.stats.lock().unwrap().operation_counts = to_map(counts);
        self
    }

    pub fn set_error_rate(&self, error_rate: f64) {
        self.health.lock().unwrap().error_rate = error_rate;
    }

    pub fn set_health(&self, health: HealthSummary) {
        *self.health.lock().unwrap() = health;
    }
}

fn to_map(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

impl IMetricsSource for StaticMetricsSource {
    fn health_summary(&self) -> HealthSummary {
        *self.health.lock().unwrap()
    }

    fn performance_stats(&self) -> PerformanceStats {
        self.stats.lock().unwrap().clone()
    }
}
