//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

use kvcompat_core::models::{AlertItem, CompatibilityIssue, Severity};

/// Log a compatibility failure that will be recovered by fallback.
pub fn compatibility_issue(operation: &str, issue: &CompatibilityIssue) {
    tracing::warn!(
        event = "compatibility_issue",
        operation = %operation,
        method = %issue.method,
        category = issue.category.as_str(),
        supported = issue.supported,
        unsupported = issue.unsupported,
        error = %issue.error_message,
        recommendation = %issue.recommendation,
        "compatibility issue"
    );
}

/// Log that the fallback leg of an operation is running.
pub fn fallback_engaged(operation: &str, method: &str) {
    tracing::info!(
        event = "fallback_engaged",
        operation = %operation,
        method = %method,
        "executing fallback"
    );
}

/// Log a call rejected by pre-flight validation.
pub fn validation_rejected(operation: &str, method: &str, reason: &str) {
    tracing::error!(
        event = "validation_rejected",
        operation = %operation,
        method = %method,
        reason = %reason,
        "call rejected before execution"
    );
}

/// Log a rank lookup that could not compute an exact position.
pub fn rank_degraded(key: &str, member: &str, reason: &str) {
    tracing::warn!(
        event = "rank_degraded",
        key = %key,
        member = %member,
        reason = %reason,
        "rank lookup degraded"
    );
}

/// Log a newly triggered alert. Warning and info go to `warn`, error and
/// critical go to `error`.
pub fn alert_triggered(alert: &AlertItem) {
    match alert.severity {
        Severity::Error | Severity::Critical => tracing::error!(
            event = "alert_triggered",
            alert_id = %alert.id,
            alert_type = alert.alert_type.as_str(),
            severity = alert.severity.as_str(),
            threshold = alert.threshold,
            actual = alert.actual_value,
            methods = ?alert.affected_methods,
            "{}",
            alert.title
        ),
        Severity::Warning | Severity::Info => tracing::warn!(
            event = "alert_triggered",
            alert_id = %alert.id,
            alert_type = alert.alert_type.as_str(),
            severity = alert.severity.as_str(),
            threshold = alert.threshold,
            actual = alert.actual_value,
            methods = ?alert.affected_methods,
            "{}",
            alert.title
        ),
    }
}

/// Log an operator acknowledgement.
pub fn alert_acknowledged(alert_id: &str, by: &str) {
    tracing::info!(
        event = "alert_acknowledged",
        alert_id = %alert_id,
        by = %by,
        "alert acknowledged"
    );
}

/// Log an operator resolution.
pub fn alert_resolved(alert_id: &str, by: &str) {
    tracing::info!(
        event = "alert_resolved",
        alert_id = %alert_id,
        by = %by,
        "alert resolved"
    );
}

/// Log a subscriber delivery failure.
pub fn subscriber_failed(subscriber_id: &str, alert_id: &str, error: &str) {
    tracing::error!(
        event = "subscriber_failed",
        subscriber = %subscriber_id,
        alert_id = %alert_id,
        error = %error,
        "alert delivery failed"
    );
}
