//! Alert models: threshold breaches and their operator lifecycle.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::Severity;

/// Which evaluator raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Compatibility,
    Performance,
    ErrorRate,
    MethodUsage,
}

impl AlertType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compatibility => "compatibility",
            Self::Performance => "performance",
            Self::ErrorRate => "error_rate",
            Self::MethodUsage => "method_usage",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle: Active → Acknowledged → Resolved, or Active → Resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

/// An evaluator's output before the manager assigns identity and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCandidate {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub threshold: f64,
    pub actual_value: f64,
    pub affected_methods: BTreeSet<String>,
    pub recommended_action: String,
}

impl AlertCandidate {
    /// Logical identity used for deduplication of active alerts.
    pub fn dedup_key(&self) -> (AlertType, Severity) {
        (self.alert_type, self.severity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertItem {
    pub id: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub triggered_at: DateTime<Utc>,
    /// Last time a repeated breach refreshed this alert.
    pub last_seen_at: DateTime<Utc>,
    pub threshold: f64,
    pub actual_value: f64,
    pub affected_methods: BTreeSet<String>,
    pub recommended_action: String,
    pub status: AlertStatus,
}

impl AlertItem {
    pub fn dedup_key(&self) -> (AlertType, Severity) {
        (self.alert_type, self.severity)
    }
}

/// Snapshot of an alert at trigger time plus operator annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertHistoryEntry {
    pub alert: AlertItem,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub notes: Option<String>,
}

impl AlertHistoryEntry {
    pub fn new(alert: AlertItem) -> Self {
        Self {
            alert,
            acknowledged_at: None,
            acknowledged_by: None,
            resolved_at: None,
            resolved_by: None,
            notes: None,
        }
    }

    /// Minutes between trigger and resolution, if resolved.
    pub fn resolution_minutes(&self) -> Option<f64> {
        self.resolved_at
            .map(|at| (at - self.alert.triggered_at).num_milliseconds() as f64 / 60_000.0)
    }
}

/// Query filter for active alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertFilter {
    pub severity: Option<Severity>,
    pub alert_type: Option<AlertType>,
    /// Also return acknowledged alerts, which remain in the active set.
    pub include_acknowledged: bool,
}

impl AlertFilter {
    pub fn severity(severity: Severity) -> Self {
        Self {
            severity: Some(severity),
            ..Self::default()
        }
    }

    pub fn alert_type(alert_type: AlertType) -> Self {
        Self {
            alert_type: Some(alert_type),
            ..Self::default()
        }
    }

    pub fn matches(&self, alert: &AlertItem) -> bool {
        let status_ok = match alert.status {
            AlertStatus::Active => true,
            AlertStatus::Acknowledged => self.include_acknowledged,
            AlertStatus::Resolved => false,
        };
        status_ok
            && self.severity.map_or(true, |s| s == alert.severity)
            && self.alert_type.map_or(true, |t| t == alert.alert_type)
    }
}

/// Operator-facing alert statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    /// Alerts currently in `Active` status.
    pub active_count: usize,
    /// Alerts triggered since local midnight.
    pub today_total: usize,
    pub today_by_type: BTreeMap<AlertType, usize>,
    pub today_by_severity: BTreeMap<Severity, usize>,
    /// Most frequently affected methods today, descending.
    pub top_affected_methods: Vec<(String, usize)>,
    /// Mean trigger-to-resolution latency over every resolved alert in history.
    pub avg_resolution_minutes: f64,
}
