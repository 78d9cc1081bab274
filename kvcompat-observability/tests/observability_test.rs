//! MetricsCollector behaviour as seen through the sink and source traits.

use std::time::Duration;

use chrono::Utc;

use kvcompat_core::models::{CompatibilityIssue, IssueCategory, OperationRecord};
use kvcompat_core::traits::{IMetricsSource, ITelemetrySink};
use kvcompat_observability::metrics::MetricsCollector;

fn record(method: &str, ms: u64, success: bool) -> OperationRecord {
    OperationRecord {
        operation: "get_player_rank".to_string(),
        method: method.to_string(),
        started_at: Utc::now(),
        duration: Duration::from_millis(ms),
        success,
        error: (!success).then(|| "boom".to_string()),
        fallback: false,
    }
}

fn issue(method: &str) -> CompatibilityIssue {
    CompatibilityIssue {
        method: method.to_string(),
        error_message: "ERR unknown command 'zrevrank'".to_string(),
        timestamp: Utc::now(),
        supported: false,
        unsupported: true,
        category: IssueCategory::UnknownCommand,
        recommendation: "Use zrange".to_string(),
    }
}

// ── Health summary ──────────────────────────────────────────────────────────

#[test]
fn empty_collector_reports_zero_health() {
    let metrics = MetricsCollector::new();
    let health = metrics.health_summary();
    assert_eq!(health.error_rate, 0.0);
    assert_eq!(health.average_response_time_ms, 0.0);
}

#[test]
fn error_rate_is_percentage_of_failed_attempts() {
    let metrics = MetricsCollector::new();
    for i in 0..10 {
        metrics.record_operation(&record("zrange", 10, i >= 2));
    }
    let health = metrics.health_summary();
    assert!((health.error_rate - 20.0).abs() < 1e-9);
    assert!((health.average_response_time_ms - 10.0).abs() < 1e-6);
}

#[test]
fn window_drops_oldest_records() {
    let metrics = MetricsCollector::with_window(4);
    // Two failures, then four successes push them out of the window.
    metrics.record_operation(&record("zrange", 100, false));
    metrics.record_operation(&record("zrange", 100, false));
    for _ in 0..4 {
        metrics.record_operation(&record("zrange", 20, true));
    }
    let health = metrics.health_summary();
    assert_eq!(health.error_rate, 0.0);
    assert!((health.average_response_time_ms - 20.0).abs() < 1e-6);
    assert_eq!(metrics.operations().window_len(), 4);
    // Lifetime counters still include them.
    assert_eq!(metrics.operations().total_failures, 2);
}

// ── Performance stats ───────────────────────────────────────────────────────

#[test]
fn performance_stats_count_per_method() {
    let metrics = MetricsCollector::new();
    metrics.record_operation(&record("zrevrank", 5, false));
    metrics.record_operation(&record("ZREVRANK", 5, false));
    metrics.record_operation(&record("zrange", 5, true));
    metrics.record_compatibility_issue(&issue("zrevrank"));

    let stats = metrics.performance_stats();
    assert_eq!(stats.operation_counts.get("zrevrank"), Some(&2));
    assert_eq!(stats.operation_counts.get("zrange"), Some(&1));
    assert_eq!(stats.compatibility_issues.get("zrevrank"), Some(&1));
    assert_eq!(
        metrics.compatibility().count_for(IssueCategory::UnknownCommand),
        1
    );
}

#[test]
fn reset_clears_everything() {
    let metrics = MetricsCollector::new();
    metrics.record_operation(&record("zrange", 5, false));
    metrics.record_compatibility_issue(&issue("zrank"));
    metrics.reset();

    assert_eq!(metrics.health_summary().error_rate, 0.0);
    assert!(metrics.performance_stats().operation_counts.is_empty());
    assert_eq!(metrics.compatibility().total(), 0);
}

#[test]
fn snapshot_serializes_counters() {
    let metrics = MetricsCollector::new();
    metrics.record_operation(&record("zscore", 7, true));
    let json = metrics.snapshot().unwrap();
    assert_eq!(json["operations"]["total_attempts"], 1);
    assert_eq!(json["health"]["error_rate"], 0.0);
}

#[test]
fn collector_is_shareable_across_threads() {
    let metrics = std::sync::Arc::new(MetricsCollector::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = metrics.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    m.record_operation(&record("zadd", 1, true));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(metrics.operations().total_attempts, 100);
}
