use crate::models::{HealthSummary, PerformanceStats};

/// Aggregated health snapshots polled by the alert monitor.
pub trait IMetricsSource: Send + Sync {
    fn health_summary(&self) -> HealthSummary;
    fn performance_stats(&self) -> PerformanceStats;
}
