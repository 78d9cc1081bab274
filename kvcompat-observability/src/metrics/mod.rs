//! Central metrics registry.
//!
//! [`MetricsCollector`] owns the operation and compatibility collectors and is
//! both the executor's telemetry sink and the alert monitor's metrics source.

pub mod compatibility_metrics;
pub mod operation_metrics;

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

pub use compatibility_metrics::CompatibilityMetrics;
pub use operation_metrics::OperationMetrics;

use kvcompat_core::constants::METRICS_WINDOW_SIZE;
use kvcompat_core::errors::CompatResult;
use kvcompat_core::models::{
    CompatibilityIssue, HealthSummary, OperationRecord, PerformanceStats,
};
use kvcompat_core::traits::{IMetricsSource, ITelemetrySink};

#[derive(Debug, Clone, Serialize)]
struct MetricsState {
    operations: OperationMetrics,
    compatibility: CompatibilityMetrics,
}

/// Thread-safe metrics registry shared by the executor and the monitor.
#[derive(Debug)]
pub struct MetricsCollector {
    state: Mutex<MetricsState>,
    window_size: usize,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::with_window(METRICS_WINDOW_SIZE)
    }

    /// Create with a custom sliding window size.
    pub fn with_window(window_size: usize) -> Self {
        Self {
            state: Mutex::new(MetricsState {
                operations: OperationMetrics::new(window_size),
                compatibility: CompatibilityMetrics::new(),
            }),
            window_size,
        }
    }

    // A poisoned lock only means a recorder panicked mid-update; the counters
    // are still usable.
    fn state(&self) -> MutexGuard<'_, MetricsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset all metrics (for testing or periodic rotation).
    pub fn reset(&self) {
        let mut state = self.state();
        state.operations = OperationMetrics::new(self.window_size);
        state.compatibility = CompatibilityMetrics::new();
    }

    pub fn operations(&self) -> OperationMetrics {
        self.state().operations.clone()
    }

    pub fn compatibility(&self) -> CompatibilityMetrics {
        self.state().compatibility.clone()
    }

    /// Serialize current counters to JSON.
    pub fn snapshot(&self) -> CompatResult<serde_json::Value> {
        let state = self.state();
        let health = HealthSummary {
            error_rate: state.operations.error_rate(),
            average_response_time_ms: state.operations.average_response_time_ms(),
        };
        Ok(serde_json::json!({
            "operations": serde_json::to_value(&state.operations)?,
            "compatibility": serde_json::to_value(&state.compatibility)?,
            "health": serde_json::to_value(health)?,
        }))
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ITelemetrySink for MetricsCollector {
    fn record_operation(&self, record: &OperationRecord) {
        tracing::debug!(
            event = "operation_recorded",
            operation = %record.operation,
            method = %record.method,
            duration_ms = record.duration.as_millis() as u64,
            success = record.success,
            fallback = record.fallback,
            "operation recorded"
        );
        self.state().operations.record(record);
    }

    fn record_compatibility_issue(&self, issue: &CompatibilityIssue) {
        self.state().compatibility.record(issue);
    }
}

impl IMetricsSource for MetricsCollector {
    fn health_summary(&self) -> HealthSummary {
        let state = self.state();
        HealthSummary {
            error_rate: state.operations.error_rate(),
            average_response_time_ms: state.operations.average_response_time_ms(),
        }
    }

    fn performance_stats(&self) -> PerformanceStats {
        let state = self.state();
        PerformanceStats {
            compatibility_issues: state.compatibility.issues_by_method.clone(),
            operation_counts: state.operations.counts_by_method.clone(),
        }
    }
}
