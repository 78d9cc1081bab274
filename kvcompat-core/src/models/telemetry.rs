//! Telemetry records exchanged with the metrics collaborator.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error buckets reported in compatibility-issue records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    MethodNotAvailable,
    MethodNotSupported,
    UnknownCommand,
    Timeout,
    ConnectionError,
    Other,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MethodNotAvailable => "method_not_available",
            Self::MethodNotSupported => "method_not_supported",
            Self::UnknownCommand => "unknown_command",
            Self::Timeout => "timeout",
            Self::ConnectionError => "connection_error",
            Self::Other => "other",
        }
    }
}

/// One timed storage attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Caller-level operation name, e.g. "get_player_rank".
    pub operation: String,
    /// Store command attempted.
    pub method: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub success: bool,
    pub error: Option<String>,
    /// Whether this attempt was the fallback leg.
    pub fallback: bool,
}

/// A compatibility failure recovered (or attempted) through fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityIssue {
    pub method: String,
    pub error_message: String,
    pub timestamp: DateTime<Utc>,
    pub supported: bool,
    pub unsupported: bool,
    pub category: IssueCategory,
    pub recommendation: String,
}

/// Aggregate health over the metrics window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Failed attempts as a percentage of all attempts.
    pub error_rate: f64,
    pub average_response_time_ms: f64,
}

/// Per-method usage counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub compatibility_issues: BTreeMap<String, u64>,
    pub operation_counts: BTreeMap<String, u64>,
}
