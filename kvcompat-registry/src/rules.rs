//! Validation rules: pure predicates over `(method, params)`.
//!
//! Predicates are plain function pointers so a rule cannot capture state;
//! evaluating the rule set is side-effect free and safe on hot paths.

use kvcompat_core::models::{
    HostStatus, MethodCategory, MethodDescriptor, RiskLevel, RuleCategory, RuleHit, Severity,
};

/// Everything a predicate may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub method: &'a str,
    pub params: &'a [String],
    pub descriptor: Option<&'a MethodDescriptor>,
}

/// A single validation rule.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub id: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub predicate: fn(&RuleInput<'_>) -> bool,
    pub message: &'static str,
    pub recommendation: &'static str,
}

impl ValidationRule {
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Option<RuleHit> {
        if !(self.predicate)(input) {
            return None;
        }
        Some(RuleHit {
            rule_id: self.id.to_string(),
            category: self.category,
            severity: self.severity,
            message: format!("{}: {}", input.method, self.message),
            recommendation: self.recommendation.to_string(),
        })
    }
}

const RANGE_METHODS: &[&str] = &["zrange", "zrevrange", "lrange"];

fn unknown_method(input: &RuleInput<'_>) -> bool {
    input.descriptor.is_none()
}

fn unsupported_without_substitute(input: &RuleInput<'_>) -> bool {
    input
        .descriptor
        .map(|d| !d.supported && d.substitution.is_none())
        .unwrap_or(false)
}

fn deprecated(input: &RuleInput<'_>) -> bool {
    input
        .descriptor
        .map(|d| d.host_status == HostStatus::Deprecated)
        .unwrap_or(false)
}

fn high_risk(input: &RuleInput<'_>) -> bool {
    input
        .descriptor
        .map(|d| d.risk_level == RiskLevel::High)
        .unwrap_or(false)
}

fn unbounded_range(input: &RuleInput<'_>) -> bool {
    let method = input.method.to_ascii_lowercase();
    RANGE_METHODS.contains(&method.as_str())
        && input.params.len() >= 3
        && input.params[1] == "0"
        && input.params[2] == "-1"
}

fn blocking_command(input: &RuleInput<'_>) -> bool {
    input
        .descriptor
        .map(|d| {
            d.category == MethodCategory::Generic
                && !d.supported
                && d.risk_level >= RiskLevel::High
                && d.substitution.is_none()
        })
        .unwrap_or(false)
}

fn empty_key(input: &RuleInput<'_>) -> bool {
    let keyed = input
        .descriptor
        .map(|d| d.category != MethodCategory::Generic)
        .unwrap_or(false);
    keyed
        && input
            .params
            .first()
            .map(|key| key.trim().is_empty())
            .unwrap_or(false)
}

/// The built-in rule set.
pub fn default_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule {
            id: "unknown-method",
            category: RuleCategory::Compatibility,
            severity: Severity::Warning,
            predicate: unknown_method,
            message: "method is not classified for this host",
            recommendation: "Register the method in the method table and verify host support",
        },
        ValidationRule {
            id: "unsupported-no-substitute",
            category: RuleCategory::Compatibility,
            severity: Severity::Warning,
            predicate: unsupported_without_substitute,
            message: "method is unsupported and has no registered substitute",
            recommendation: "Provide a fallback that avoids this method entirely",
        },
        ValidationRule {
            id: "deprecated-method",
            category: RuleCategory::Compatibility,
            severity: Severity::Warning,
            predicate: deprecated,
            message: "method is deprecated on this host",
            recommendation: "Migrate to the current equivalent command",
        },
        ValidationRule {
            id: "high-risk-method",
            category: RuleCategory::Compatibility,
            severity: Severity::Warning,
            predicate: high_risk,
            message: "method is high risk on this host",
            recommendation: "Prefer the registered substitution or a supported equivalent",
        },
        ValidationRule {
            id: "unbounded-range",
            category: RuleCategory::Performance,
            severity: Severity::Warning,
            predicate: unbounded_range,
            message: "range covers the whole collection",
            recommendation: "Bound the range to the rows actually needed",
        },
        ValidationRule {
            id: "blocking-command",
            category: RuleCategory::Safety,
            severity: Severity::Error,
            predicate: blocking_command,
            message: "keyspace-wide command is unavailable and has no substitute",
            recommendation: "Maintain an explicit index key instead of walking the keyspace",
        },
        ValidationRule {
            id: "empty-key",
            category: RuleCategory::Safety,
            severity: Severity::Error,
            predicate: empty_key,
            message: "key argument is empty",
            recommendation: "Pass a non-empty key",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MethodRegistry;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn unbounded_range_matches_full_scan_only() {
        let registry = MethodRegistry::with_defaults();
        let full = params(&["lb", "0", "-1"]);
        let bounded = params(&["lb", "0", "9"]);
        let rule = default_rules()
            .into_iter()
            .find(|r| r.id == "unbounded-range")
            .unwrap();
        let descriptor = registry.get_method_config("zrange");
        let full_input = RuleInput {
            method: "zrange",
            params: &full,
            descriptor,
        };
        let bounded_input = RuleInput {
            method: "zrange",
            params: &bounded,
            descriptor,
        };
        assert!(rule.evaluate(&full_input).is_some());
        assert!(rule.evaluate(&bounded_input).is_none());
    }

    #[test]
    fn empty_key_ignores_generic_commands() {
        let registry = MethodRegistry::with_defaults();
        let empty = params(&[""]);
        let rule = default_rules()
            .into_iter()
            .find(|r| r.id == "empty-key")
            .unwrap();
        let zadd = RuleInput {
            method: "zadd",
            params: &empty,
            descriptor: registry.get_method_config("zadd"),
        };
        let multi = RuleInput {
            method: "multi",
            params: &empty,
            descriptor: registry.get_method_config("multi"),
        };
        assert!(rule.evaluate(&zadd).is_some());
        assert!(rule.evaluate(&multi).is_none());
    }

    #[test]
    fn hit_message_names_the_method() {
        let rule = &default_rules()[0];
        let hit = rule
            .evaluate(&RuleInput {
                method: "georadius",
                params: &[],
                descriptor: None,
            })
            .unwrap();
        assert!(hit.message.starts_with("georadius"));
        assert_eq!(hit.severity, Severity::Warning);
    }
}
