//! Validation engine behaviour over the built-in method table.

use std::sync::Arc;

use proptest::prelude::*;

use kvcompat_core::models::{
    MethodCategory, MethodDescriptor, RiskLevel, RuleCategory, Severity, Verdict,
};
use kvcompat_registry::{MethodRegistry, RuleInput, ValidationEngine, ValidationRule};

fn engine() -> ValidationEngine {
    ValidationEngine::new(Arc::new(MethodRegistry::with_defaults()))
}

fn params(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Registry-wide properties
// ---------------------------------------------------------------------------

#[test]
fn every_critical_method_without_substitution_is_rejected() {
    let engine = engine();
    let blocked: Vec<MethodDescriptor> = engine
        .registry()
        .iter()
        .filter(|d| d.risk_level == RiskLevel::Critical && d.substitution.is_none())
        .cloned()
        .collect();
    assert!(!blocked.is_empty());

    for d in blocked {
        let result = engine.validate(&d.name, &params(&["key"]));
        assert!(!result.should_proceed(), "{} must be rejected", d.name);
        assert!(!result.requires_fallback());
        match result.verdict {
            Verdict::Reject { recommendation, .. } => {
                assert!(recommendation.starts_with("Redesign"))
            }
            other => panic!("{} expected reject, got {other:?}", d.name),
        }
    }
}

#[test]
fn every_unsupported_method_with_substitution_requires_fallback() {
    let engine = engine();
    let substitutable: Vec<MethodDescriptor> = engine
        .registry()
        .iter()
        .filter(|d| !d.supported && d.substitution.is_some())
        .cloned()
        .collect();
    assert!(!substitutable.is_empty());

    for d in substitutable {
        let result = engine.validate(&d.name, &params(&["key"]));
        assert!(result.should_proceed(), "{}", d.name);
        assert!(result.requires_fallback(), "{}", d.name);
        assert_eq!(result.substitution, d.substitution);
    }
}

// ---------------------------------------------------------------------------
// Individual verdicts
// ---------------------------------------------------------------------------

#[test]
fn supported_method_proceeds_without_warning() {
    let result = engine().validate("zadd", &params(&["lb", "10", "alice"]));
    assert_eq!(result.verdict, Verdict::Proceed { warning: None });
    assert!(result.supported);
    assert!(result.is_valid());
    assert!(result.warning().is_none());
    assert!(result.recommendation().is_none());
}

#[test]
fn zrevrank_proceeds_with_algorithmic_substitute() {
    let result = engine().validate("zrevrank", &params(&["lb", "alice"]));
    match &result.verdict {
        Verdict::ProceedWithFallback { substitution } => {
            assert_eq!(substitution.target_method, "zrange");
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert_eq!(result.recommendation(), Some("zrange"));
}

#[test]
fn unknown_method_proceeds_with_warning() {
    let result = engine().validate("georadius", &params(&["geo"]));
    assert!(result.should_proceed());
    let warning = result.warning().expect("warning surfaced");
    assert_eq!(warning.rule_id, "unknown-method");
    assert_eq!(warning.severity, Severity::Warning);
    assert!(result.risk_level.is_none());
}

#[test]
fn full_range_scan_warns_but_proceeds() {
    let result = engine().validate("zrange", &params(&["lb", "0", "-1"]));
    assert!(result.should_proceed());
    assert_eq!(result.warning().unwrap().category, RuleCategory::Performance);
}

#[test]
fn keyspace_scan_is_rejected_by_rule() {
    let result = engine().validate("scan", &params(&["0"]));
    match result.verdict {
        Verdict::Reject { reason, .. } => assert!(reason.contains("keyspace-wide")),
        other => panic!("expected reject, got {other:?}"),
    }
}

#[test]
fn empty_key_is_rejected() {
    let result = engine().validate("zscore", &params(&["", "alice"]));
    assert!(!result.should_proceed());
}

#[test]
fn unsupported_without_substitute_surfaces_highest_warning() {
    // xadd: unsupported, high risk, no substitution → two warnings, proceeds.
    let result = engine().validate("xadd", &params(&["events"]));
    assert!(result.should_proceed());
    assert!(!result.requires_fallback());
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warning().unwrap().rule_id, "unsupported-no-substitute");
}

#[test]
fn deprecated_method_warns() {
    let result = engine().validate("hmset", &params(&["h", "f", "v"]));
    assert!(result.supported);
    assert_eq!(result.warning().unwrap().rule_id, "deprecated-method");
}

#[test]
fn custom_rule_can_reject() {
    fn no_delete(input: &RuleInput<'_>) -> bool {
        input.method.eq_ignore_ascii_case("del")
    }
    let engine = engine().with_rule(ValidationRule {
        id: "no-delete",
        category: RuleCategory::Safety,
        severity: Severity::Critical,
        predicate: no_delete,
        message: "deletes are disabled",
        recommendation: "Expire keys instead",
    });
    let result = engine.validate("DEL", &params(&["k"]));
    assert!(!result.should_proceed());
    assert_eq!(result.recommendation(), Some("Expire keys instead"));
}

#[test]
fn custom_table_critical_without_substitute_rejects() {
    let registry = MethodRegistry::from_descriptors(vec![MethodDescriptor::unsupported(
        "eval",
        MethodCategory::Generic,
        RiskLevel::Critical,
        "Run a script",
        "Inline the logic",
    )]);
    let engine = ValidationEngine::new(Arc::new(registry));
    assert!(!engine.validate("eval", &[]).should_proceed());
}

#[test]
fn validation_is_repeatable() {
    let engine = engine();
    let a = engine.validate("zrank", &params(&["lb", "bob"]));
    let b = engine.validate("zrank", &params(&["lb", "bob"]));
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn prop_validate_never_panics_and_is_consistent(
        method in "[a-z]{1,12}",
        key in "[a-z:]{0,8}",
    ) {
        let engine = engine();
        let result = engine.validate(&method, &[key]);
        // Fallback implies proceed; reject implies no fallback.
        if result.requires_fallback() {
            prop_assert!(result.should_proceed());
        }
        if !result.should_proceed() {
            prop_assert!(!result.requires_fallback());
        }
        // Warnings are ordered by severity, highest first.
        for pair in result.warnings.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }
    }
}
