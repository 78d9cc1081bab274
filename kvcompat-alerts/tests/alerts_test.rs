//! Alert manager lifecycle, queries, stats and subscriber delivery.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use kvcompat_alerts::{AlertManager, AlertSubscriber};
use kvcompat_core::config::MonitorConfig;
use kvcompat_core::errors::{AlertError, CompatError};
use kvcompat_core::models::{AlertCandidate, AlertFilter, AlertStatus, AlertType, Severity};
use test_fixtures::{
    FailingSubscriber, HangingSubscriber, PanickingSubscriber, RecordingSubscriber,
};

fn manager() -> AlertManager {
    AlertManager::new(MonitorConfig::default())
}

fn candidate(alert_type: AlertType, severity: Severity, methods: &[&str]) -> AlertCandidate {
    AlertCandidate {
        alert_type,
        severity,
        title: format!("{alert_type} {severity}"),
        description: "threshold breached".to_string(),
        threshold: 10.0,
        actual_value: 12.0,
        affected_methods: methods.iter().map(|m| m.to_string()).collect::<BTreeSet<_>>(),
        recommended_action: "Investigate".to_string(),
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_id_returns_false_without_state_change() {
    let m = manager();
    m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Warning, &[]))
        .await
        .unwrap();
    let before = m.get_alert_history(10).unwrap();

    assert!(!m.acknowledge_alert("nope", "ops", Some("n/a")).unwrap());
    assert!(!m.resolve_alert("nope", "ops", None).unwrap());

    assert_eq!(m.get_alert_history(10).unwrap(), before);
    assert_eq!(m.get_active_alerts(&AlertFilter::default()).unwrap().len(), 1);
}

#[tokio::test]
async fn acknowledge_then_resolve_records_operator_details() {
    let m = manager();
    let id = m
        .trigger_alert(candidate(AlertType::Compatibility, Severity::Critical, &["zrevrank"]))
        .await
        .unwrap()
        .alert()
        .id
        .clone();

    assert!(m.acknowledge_alert(&id, "alice", Some("looking")).unwrap());
    // Re-acknowledging is harmless and overwrites the notes.
    assert!(m.acknowledge_alert(&id, "alice", Some("still looking")).unwrap());
    assert!(m.get_active_alerts(&AlertFilter::default()).unwrap().is_empty());
    let with_acked = AlertFilter {
        include_acknowledged: true,
        ..AlertFilter::default()
    };
    assert_eq!(m.get_active_alerts(&with_acked).unwrap().len(), 1);

    assert!(m.resolve_alert(&id, "bob", Some("patched")).unwrap());
    let entry = &m.get_alert_history(1).unwrap()[0];
    assert_eq!(entry.alert.status, AlertStatus::Resolved);
    assert_eq!(entry.acknowledged_by.as_deref(), Some("alice"));
    assert_eq!(entry.resolved_by.as_deref(), Some("bob"));
    assert_eq!(entry.notes.as_deref(), Some("patched"));
    assert!(entry.resolved_at.is_some());
}

#[tokio::test]
async fn resolved_alert_cannot_be_acknowledged() {
    let m = manager();
    let id = m
        .trigger_alert(candidate(AlertType::ErrorRate, Severity::Error, &[]))
        .await
        .unwrap()
        .alert()
        .id
        .clone();
    assert!(m.resolve_alert(&id, "ops", None).unwrap());
    assert!(!m.acknowledge_alert(&id, "ops", None).unwrap());
    assert_eq!(
        m.get_alert_history(1).unwrap()[0].alert.status,
        AlertStatus::Resolved
    );
}

#[tokio::test]
async fn resolved_alert_leaves_active_set_after_grace_but_stays_in_history() {
    let m = manager();
    let id = m
        .trigger_alert(candidate(AlertType::Performance, Severity::Warning, &[]))
        .await
        .unwrap()
        .alert()
        .id
        .clone();
    assert!(m.resolve_alert(&id, "ops", None).unwrap());

    // Still within the grace period.
    assert_eq!(m.sweep_resolved(Utc::now()).unwrap(), 0);
    assert!(m.resolve_alert(&id, "ops", None).unwrap());

    assert_eq!(m.sweep_resolved(Utc::now() + Duration::seconds(61)).unwrap(), 1);
    assert!(!m.resolve_alert(&id, "ops", None).unwrap());
    let with_acked = AlertFilter {
        include_acknowledged: true,
        ..AlertFilter::default()
    };
    assert!(m.get_active_alerts(&with_acked).unwrap().is_empty());

    let history = m.get_alert_history(100).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].alert.id, id);
}

// ── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn active_alerts_sort_by_severity_then_recency() {
    let m = manager();
    m.trigger_alert(candidate(AlertType::Performance, Severity::Warning, &[]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::MethodUsage, Severity::Warning, &[]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::Compatibility, Severity::Error, &[]))
        .await
        .unwrap();

    let active = m.get_active_alerts(&AlertFilter::default()).unwrap();
    let order: Vec<(Severity, AlertType)> =
        active.iter().map(|a| (a.severity, a.alert_type)).collect();
    assert_eq!(order[0], (Severity::Critical, AlertType::ErrorRate));
    assert_eq!(order[1], (Severity::Error, AlertType::Compatibility));
    assert_eq!(order[2].0, Severity::Warning);
    assert_eq!(order[3].0, Severity::Warning);
    assert!(active[2].triggered_at >= active[3].triggered_at);
}

#[tokio::test]
async fn filters_narrow_active_alerts() {
    let m = manager();
    m.trigger_alert(candidate(AlertType::Performance, Severity::Warning, &[]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
        .await
        .unwrap();

    let critical = m
        .get_active_alerts(&AlertFilter::severity(Severity::Critical))
        .unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].alert_type, AlertType::ErrorRate);

    let perf = m
        .get_active_alerts(&AlertFilter::alert_type(AlertType::Performance))
        .unwrap();
    assert_eq!(perf.len(), 1);
    assert_eq!(perf[0].severity, Severity::Warning);
}

#[tokio::test]
async fn history_limit_returns_newest_first() {
    let m = manager();
    for t in [AlertType::ErrorRate, AlertType::Performance, AlertType::Compatibility] {
        m.trigger_alert(candidate(t, Severity::Warning, &[])).await.unwrap();
    }
    let history = m.get_alert_history(2).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].alert.alert_type, AlertType::Compatibility);
    assert_eq!(history[1].alert.alert_type, AlertType::Performance);
}

#[tokio::test]
async fn stats_cover_today_and_all_resolutions() {
    let m = manager();
    let first = m
        .trigger_alert(candidate(AlertType::Compatibility, Severity::Warning, &["zrank", "zrevrank"]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::MethodUsage, Severity::Critical, &["zrevrank"]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
        .await
        .unwrap();
    m.resolve_alert(&first.alert().id, "ops", None).unwrap();

    let stats = m.get_alert_stats().unwrap();
    assert_eq!(stats.active_count, 2);
    assert_eq!(stats.today_total, 3);
    assert_eq!(stats.today_by_severity.get(&Severity::Critical), Some(&2));
    assert_eq!(stats.today_by_type.get(&AlertType::Compatibility), Some(&1));
    assert_eq!(stats.top_affected_methods[0], ("zrevrank".to_string(), 2));
    assert_eq!(stats.top_affected_methods[1], ("zrank".to_string(), 1));
    assert!(stats.avg_resolution_minutes >= 0.0);
    assert!(stats.avg_resolution_minutes < 1.0);
}

#[tokio::test]
async fn stats_without_resolutions_report_zero_average() {
    let m = manager();
    m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Warning, &[]))
        .await
        .unwrap();
    assert_eq!(m.get_alert_stats().unwrap().avg_resolution_minutes, 0.0);
}

// ── Subscribers ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_subscriber_does_not_block_others() {
    let m = manager();
    let failing = Arc::new(FailingSubscriber::new());
    let recording = Arc::new(RecordingSubscriber::new());
    m.subscribe(AlertSubscriber::new("pager", "Pager", failing.clone()))
        .unwrap();
    m.subscribe(AlertSubscriber::new("log", "Log sink", recording.clone()))
        .unwrap();

    let outcome = m
        .trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
        .await
        .unwrap();

    assert_eq!(failing.attempts(), 1);
    assert_eq!(recording.count(), 1);
    assert_eq!(recording.received()[0].id, outcome.alert().id);
}

#[tokio::test]
async fn panicking_subscriber_does_not_block_others() {
    let m = Arc::new(manager());
    let panicking = Arc::new(PanickingSubscriber::new());
    let recording = Arc::new(RecordingSubscriber::new());
    m.subscribe(AlertSubscriber::new("crashy", "Crashy hook", panicking.clone()))
        .unwrap();
    m.subscribe(AlertSubscriber::new("log", "Log sink", recording.clone()))
        .unwrap();

    let task = {
        let m = m.clone();
        tokio::spawn(async move {
            m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
                .await
        })
    };
    let outcome = task.await.expect("trigger task must not panic").unwrap();

    assert!(outcome.is_created());
    assert_eq!(panicking.attempts(), 1);
    assert_eq!(recording.count(), 1);
    assert_eq!(recording.received()[0].id, outcome.alert().id);
}

#[tokio::test(start_paused = true)]
async fn hanging_subscriber_times_out_without_blocking_others() {
    let m = AlertManager::new(MonitorConfig {
        delivery_timeout_ms: 250,
        ..MonitorConfig::default()
    });
    let hanging = Arc::new(HangingSubscriber::new());
    let recording = Arc::new(RecordingSubscriber::new());
    m.subscribe(AlertSubscriber::new("slow", "Slow webhook", hanging.clone()))
        .unwrap();
    m.subscribe(AlertSubscriber::new("log", "Log sink", recording.clone()))
        .unwrap();

    let started = tokio::time::Instant::now();
    let outcome = m
        .trigger_alert(candidate(AlertType::Performance, Severity::Warning, &[]))
        .await
        .unwrap();

    assert!(outcome.is_created());
    assert!(started.elapsed() >= std::time::Duration::from_millis(250));
    assert_eq!(hanging.attempts(), 1);
    assert_eq!(recording.count(), 1);
}

#[tokio::test]
async fn subscriber_filters_admit_matching_alerts_only() {
    let m = manager();
    let critical_only = Arc::new(RecordingSubscriber::new());
    let perf_only = Arc::new(RecordingSubscriber::new());
    m.subscribe(
        AlertSubscriber::new("oncall", "On-call", critical_only.clone())
            .with_min_severity(Severity::Error),
    )
    .unwrap();
    m.subscribe(
        AlertSubscriber::new("perf", "Perf dashboard", perf_only.clone())
            .with_alert_type(AlertType::Performance),
    )
    .unwrap();

    m.trigger_alert(candidate(AlertType::Performance, Severity::Warning, &[]))
        .await
        .unwrap();
    m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
        .await
        .unwrap();

    assert_eq!(critical_only.count(), 1);
    assert_eq!(critical_only.received()[0].alert_type, AlertType::ErrorRate);
    assert_eq!(perf_only.count(), 1);
    assert_eq!(perf_only.received()[0].severity, Severity::Warning);
}

#[tokio::test]
async fn refreshed_alert_is_not_redelivered() {
    let m = manager();
    let recording = Arc::new(RecordingSubscriber::new());
    m.subscribe(AlertSubscriber::new("log", "Log sink", recording.clone()))
        .unwrap();

    for _ in 0..3 {
        m.trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, &[]))
            .await
            .unwrap();
    }
    assert_eq!(recording.count(), 1);
}

#[test]
fn duplicate_subscriber_is_rejected_and_unsubscribe_reports_presence() {
    let m = manager();
    let sink = Arc::new(RecordingSubscriber::new());
    m.subscribe(AlertSubscriber::new("log", "Log sink", sink.clone()))
        .unwrap();

    let err = m
        .subscribe(AlertSubscriber::new("log", "Other", sink))
        .unwrap_err();
    assert!(matches!(
        err,
        CompatError::AlertError(AlertError::DuplicateSubscriber { ref id }) if id == "log"
    ));

    assert!(m.unsubscribe("log").unwrap());
    assert!(!m.unsubscribe("log").unwrap());
    assert_eq!(m.subscriber_count(), 0);
}
