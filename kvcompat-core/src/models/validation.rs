//! Validation verdicts produced by the validation engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::method::{RiskLevel, SubstitutionDescriptor};

/// Severity shared by validation rules and alerts.
/// Ordered so that `Critical` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Error and critical hits reject the call.
    pub fn is_blocking(self) -> bool {
        self >= Self::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Compatibility,
    Performance,
    Safety,
}

/// A rule that matched a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    pub rule_id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

/// The single outcome of validating a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Call the primary directly. Carries the highest-severity warning, if any.
    Proceed { warning: Option<RuleHit> },
    /// The method is unsupported but substitutable; the fallback is expected to run.
    ProceedWithFallback {
        substitution: SubstitutionDescriptor,
    },
    /// Do not attempt the call.
    Reject {
        reason: String,
        recommendation: String,
    },
}

/// Per-call verdict bundled with the registry facts it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityCheckResult {
    pub method: String,
    /// Whether the registry knows the method and marks it supported.
    pub supported: bool,
    /// Risk of the method, `None` when the registry does not know it.
    pub risk_level: Option<RiskLevel>,
    pub substitution: Option<SubstitutionDescriptor>,
    /// Every rule that matched, highest severity first.
    pub warnings: Vec<RuleHit>,
    pub verdict: Verdict,
}

impl CompatibilityCheckResult {
    pub fn should_proceed(&self) -> bool {
        !matches!(self.verdict, Verdict::Reject { .. })
    }

    pub fn requires_fallback(&self) -> bool {
        matches!(self.verdict, Verdict::ProceedWithFallback { .. })
    }

    /// Alias kept for call sites that only ask "may I call this".
    pub fn is_valid(&self) -> bool {
        self.should_proceed()
    }

    /// The warning surfaced to the caller, if any.
    pub fn warning(&self) -> Option<&RuleHit> {
        match &self.verdict {
            Verdict::Proceed { warning } => warning.as_ref(),
            _ => self.warnings.first(),
        }
    }

    pub fn recommendation(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Reject { recommendation, .. } => Some(recommendation),
            Verdict::ProceedWithFallback { substitution } => Some(&substitution.target_method),
            Verdict::Proceed { warning } => warning.as_ref().map(|w| w.recommendation.as_str()),
        }
    }
}
