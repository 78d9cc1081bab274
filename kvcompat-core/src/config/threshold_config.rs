use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::Severity;

/// A warning/critical pair. A value at or above `critical` is critical,
/// otherwise at or above `warning` is a warning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdPair {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    /// Classify an observed value. Critical suppresses warning.
    pub fn classify(&self, observed: f64) -> Option<(Severity, f64)> {
        if observed >= self.critical {
            Some((Severity::Critical, self.critical))
        } else if observed >= self.warning {
            Some((Severity::Warning, self.warning))
        } else {
            None
        }
    }
}

/// The four alert threshold pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Error rate in percent.
    pub error_rate: ThresholdPair,
    /// Average response time in milliseconds.
    pub response_time: ThresholdPair,
    /// Total compatibility issues across methods.
    pub compatibility_issues: ThresholdPair,
    /// Total calls made to methods the registry marks unsupported.
    pub unsupported_method_usage: ThresholdPair,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            error_rate: ThresholdPair::new(
                defaults::DEFAULT_ERROR_RATE_WARNING,
                defaults::DEFAULT_ERROR_RATE_CRITICAL,
            ),
            response_time: ThresholdPair::new(
                defaults::DEFAULT_RESPONSE_TIME_WARNING_MS,
                defaults::DEFAULT_RESPONSE_TIME_CRITICAL_MS,
            ),
            compatibility_issues: ThresholdPair::new(
                defaults::DEFAULT_COMPAT_ISSUES_WARNING,
                defaults::DEFAULT_COMPAT_ISSUES_CRITICAL,
            ),
            unsupported_method_usage: ThresholdPair::new(
                defaults::DEFAULT_UNSUPPORTED_USAGE_WARNING,
                defaults::DEFAULT_UNSUPPORTED_USAGE_CRITICAL,
            ),
        }
    }
}

impl ThresholdConfig {
    /// Named view over all pairs, used by validation and reporting.
    pub fn pairs(&self) -> [(&'static str, ThresholdPair); 4] {
        [
            ("thresholds.error_rate", self.error_rate),
            ("thresholds.response_time", self.response_time),
            ("thresholds.compatibility_issues", self.compatibility_issues),
            (
                "thresholds.unsupported_method_usage",
                self.unsupported_method_usage,
            ),
        ]
    }
}
