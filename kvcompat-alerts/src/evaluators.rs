//! Threshold evaluators: metrics snapshot → alert candidates.
//!
//! Each evaluator emits at most one candidate per tick; critical suppresses
//! warning.

use std::collections::BTreeSet;

use kvcompat_core::config::{ThresholdConfig, ThresholdPair};
use kvcompat_core::models::{AlertCandidate, AlertType, HealthSummary, PerformanceStats};
use kvcompat_registry::MethodRegistry;

/// Error rate (%) against its pair.
pub fn evaluate_error_rate(health: &HealthSummary, pair: ThresholdPair) -> Option<AlertCandidate> {
    let (severity, threshold) = pair.classify(health.error_rate)?;
    Some(AlertCandidate {
        alert_type: AlertType::ErrorRate,
        severity,
        title: format!("Storage error rate at {:.1}%", health.error_rate),
        description: format!(
            "{:.1}% of recent storage attempts failed (threshold {threshold}%)",
            health.error_rate
        ),
        threshold,
        actual_value: health.error_rate,
        affected_methods: BTreeSet::new(),
        recommended_action: "Check store connectivity and recent compatibility failures"
            .to_string(),
    })
}

/// Average response time (ms) against its pair.
pub fn evaluate_response_time(
    health: &HealthSummary,
    pair: ThresholdPair,
) -> Option<AlertCandidate> {
    let observed = health.average_response_time_ms;
    let (severity, threshold) = pair.classify(observed)?;
    Some(AlertCandidate {
        alert_type: AlertType::Performance,
        severity,
        title: format!("Average storage latency {observed:.0}ms"),
        description: format!(
            "Average storage attempt took {observed:.0}ms (threshold {threshold}ms)"
        ),
        threshold,
        actual_value: observed,
        affected_methods: BTreeSet::new(),
        recommended_action: "Look for full-collection scans and slow fallbacks".to_string(),
    })
}

/// Total compatibility issues across methods.
pub fn evaluate_compatibility_issues(
    stats: &PerformanceStats,
    pair: ThresholdPair,
) -> Option<AlertCandidate> {
    let total: u64 = stats.compatibility_issues.values().sum();
    let (severity, threshold) = pair.classify(total as f64)?;
    let affected: BTreeSet<String> = stats
        .compatibility_issues
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(method, _)| method.clone())
        .collect();
    Some(AlertCandidate {
        alert_type: AlertType::Compatibility,
        severity,
        title: format!("{total} compatibility issues"),
        description: format!(
            "Fallbacks engaged {total} times across {} methods (threshold {threshold})",
            affected.len()
        ),
        threshold,
        actual_value: total as f64,
        affected_methods: affected,
        recommended_action: "Replace the listed methods with their registered substitutes"
            .to_string(),
    })
}

/// Calls to methods the registry classifies as unsupported.
pub fn evaluate_unsupported_usage(
    stats: &PerformanceStats,
    registry: &MethodRegistry,
    pair: ThresholdPair,
) -> Option<AlertCandidate> {
    let offending: Vec<(&String, u64)> = stats
        .operation_counts
        .iter()
        .filter(|(method, count)| **count > 0 && registry.is_unsupported(method))
        .map(|(method, count)| (method, *count))
        .collect();
    let total: u64 = offending.iter().map(|(_, c)| c).sum();
    let (severity, threshold) = pair.classify(total as f64)?;
    let affected: BTreeSet<String> = offending.into_iter().map(|(m, _)| m.clone()).collect();
    Some(AlertCandidate {
        alert_type: AlertType::MethodUsage,
        severity,
        title: format!("{total} calls to unsupported methods"),
        description: format!(
            "Unsupported methods were called {total} times: {} (threshold {threshold})",
            affected.iter().cloned().collect::<Vec<_>>().join(", ")
        ),
        threshold,
        actual_value: total as f64,
        affected_methods: affected,
        recommended_action: "Route these calls through their substitutions or redesign them"
            .to_string(),
    })
}

/// Run all four evaluators over one snapshot.
pub fn evaluate_all(
    health: &HealthSummary,
    stats: &PerformanceStats,
    thresholds: &ThresholdConfig,
    registry: &MethodRegistry,
) -> Vec<AlertCandidate> {
    [
        evaluate_error_rate(health, thresholds.error_rate),
        evaluate_response_time(health, thresholds.response_time),
        evaluate_compatibility_issues(stats, thresholds.compatibility_issues),
        evaluate_unsupported_usage(stats, registry, thresholds.unsupported_method_usage),
    ]
    .into_iter()
    .flatten()
    .collect()
}
