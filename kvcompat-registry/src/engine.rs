//! ValidationEngine: turns registry facts and rule hits into one [`Verdict`].

use std::sync::Arc;

use tracing::debug;

use kvcompat_core::models::{CompatibilityCheckResult, RuleHit, Verdict};

use crate::registry::MethodRegistry;
use crate::rules::{default_rules, RuleInput, ValidationRule};

const REDESIGN_RECOMMENDATION: &str =
    "Redesign the call site: this method is unavailable on the host and has no safe substitute";

/// Stateless rule evaluator over the method registry.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: Arc<MethodRegistry>,
    rules: Vec<ValidationRule>,
}

impl ValidationEngine {
    /// Engine with the built-in rule set.
    pub fn new(registry: Arc<MethodRegistry>) -> Self {
        Self {
            registry,
            rules: default_rules(),
        }
    }

    /// Add a rule after the built-in ones.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Validate a call before it is attempted.
    ///
    /// 1. Unsupported, critical, no substitution → reject.
    /// 2. Unsupported with a substitution → proceed with fallback.
    /// 3. Otherwise every rule runs; an error/critical hit rejects, else the
    ///    highest-severity hit is surfaced as the warning.
    pub fn validate(&self, method: &str, params: &[String]) -> CompatibilityCheckResult {
        let descriptor = self.registry.get_method_config(method);
        let supported = descriptor.map(|d| d.supported).unwrap_or(false);
        let risk_level = descriptor.map(|d| d.risk_level);
        let substitution = descriptor.and_then(|d| d.substitution.clone());

        let input = RuleInput {
            method,
            params,
            descriptor,
        };
        let mut hits: Vec<RuleHit> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(&input))
            .collect();
        // Stable: among equal severities the rule order is kept.
        hits.sort_by(|a, b| b.severity.cmp(&a.severity));

        let verdict = match descriptor {
            Some(d) if d.is_blocked() => Verdict::Reject {
                reason: format!(
                    "{} is unsupported, {:?} risk, with no substitution",
                    d.name, d.risk_level
                ),
                recommendation: REDESIGN_RECOMMENDATION.to_string(),
            },
            Some(d) if !d.supported => match &d.substitution {
                Some(sub) => Verdict::ProceedWithFallback {
                    substitution: sub.clone(),
                },
                None => verdict_from_hits(&hits),
            },
            _ => verdict_from_hits(&hits),
        };

        debug!(
            method,
            supported,
            hits = hits.len(),
            verdict = verdict_name(&verdict),
            "validated call"
        );

        CompatibilityCheckResult {
            method: method.to_string(),
            supported,
            risk_level,
            substitution,
            warnings: hits,
            verdict,
        }
    }
}

fn verdict_from_hits(hits: &[RuleHit]) -> Verdict {
    match hits.first() {
        Some(hit) if hit.severity.is_blocking() => Verdict::Reject {
            reason: hit.message.clone(),
            recommendation: hit.recommendation.clone(),
        },
        first => Verdict::Proceed {
            warning: first.cloned(),
        },
    }
}

fn verdict_name(verdict: &Verdict) -> &'static str {
    match verdict {
        Verdict::Proceed { .. } => "proceed",
        Verdict::ProceedWithFallback { .. } => "proceed_with_fallback",
        Verdict::Reject { .. } => "reject",
    }
}
