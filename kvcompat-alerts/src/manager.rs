//! Alert lifecycle: trigger, deduplicate, acknowledge, resolve, sweep.
//!
//! Active alerts are keyed logically by `(type, severity)`. A repeated breach
//! refreshes the existing non-resolved alert instead of raising a new one, so
//! consecutive ticks over the same threshold produce one alert.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use kvcompat_core::config::MonitorConfig;
use kvcompat_core::errors::{CompatError, CompatResult};
use kvcompat_core::models::{
    AlertCandidate, AlertFilter, AlertHistoryEntry, AlertItem, AlertStats, AlertStatus,
    AlertType, Severity,
};
use kvcompat_observability::tracing_setup::events;

use crate::subscribers::{AlertSubscriber, SubscriberRegistry};

/// What `trigger_alert` did with a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "alert", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Created(AlertItem),
    Refreshed(AlertItem),
}

impl TriggerOutcome {
    pub fn alert(&self) -> &AlertItem {
        match self {
            Self::Created(alert) | Self::Refreshed(alert) => alert,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[derive(Debug)]
struct ActiveEntry {
    alert: AlertItem,
    resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct AlertState {
    active: Vec<ActiveEntry>,
    /// Oldest first; bounded by `history_capacity`.
    history: VecDeque<AlertHistoryEntry>,
    trigger_counts: HashMap<(AlertType, Severity), u64>,
}

impl AlertState {
    fn history_entry_mut(&mut self, id: &str) -> Option<&mut AlertHistoryEntry> {
        self.history.iter_mut().rev().find(|e| e.alert.id == id)
    }
}

/// Owns the active alert set, history, counters and subscribers.
pub struct AlertManager {
    state: Mutex<AlertState>,
    subscribers: SubscriberRegistry,
    config: MonitorConfig,
}

impl AlertManager {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            state: Mutex::new(AlertState::default()),
            subscribers: SubscriberRegistry::with_timeout(config.delivery_timeout()),
            config,
        }
    }

    fn state(&self) -> CompatResult<MutexGuard<'_, AlertState>> {
        self.state
            .lock()
            .map_err(|e| CompatError::ConcurrencyError(format!("alert state lock: {e}")))
    }

    pub fn subscribe(&self, subscriber: AlertSubscriber) -> CompatResult<()> {
        self.subscribers.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: &str) -> CompatResult<bool> {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Raise an alert for a threshold breach.
    ///
    /// A non-resolved alert with the same `(type, severity)` is refreshed in
    /// place. Otherwise a new alert is stored, snapshotted to history, logged
    /// and delivered to every admitting subscriber.
    pub async fn trigger_alert(&self, candidate: AlertCandidate) -> CompatResult<TriggerOutcome> {
        let now = Utc::now();
        let created = {
            let mut state = self.state()?;

            if let Some(entry) = state.active.iter_mut().find(|e| {
                e.alert.status != AlertStatus::Resolved
                    && e.alert.dedup_key() == candidate.dedup_key()
            }) {
                let alert = &mut entry.alert;
                alert.actual_value = candidate.actual_value;
                alert.threshold = candidate.threshold;
                alert.affected_methods = candidate.affected_methods;
                alert.description = candidate.description;
                alert.last_seen_at = now;
                debug!(
                    alert_id = %alert.id,
                    alert_type = alert.alert_type.as_str(),
                    actual = alert.actual_value,
                    "active alert refreshed"
                );
                return Ok(TriggerOutcome::Refreshed(alert.clone()));
            }

            let alert = AlertItem {
                id: format!("{}-{}", candidate.alert_type, Uuid::new_v4()),
                alert_type: candidate.alert_type,
                severity: candidate.severity,
                title: candidate.title,
                description: candidate.description,
                triggered_at: now,
                last_seen_at: now,
                threshold: candidate.threshold,
                actual_value: candidate.actual_value,
                affected_methods: candidate.affected_methods,
                recommended_action: candidate.recommended_action,
                status: AlertStatus::Active,
            };
            state.active.push(ActiveEntry {
                alert: alert.clone(),
                resolved_at: None,
            });
            state.history.push_back(AlertHistoryEntry::new(alert.clone()));
            while state.history.len() > self.config.history_capacity {
                state.history.pop_front();
            }
            *state
                .trigger_counts
                .entry(alert.dedup_key())
                .or_insert(0) += 1;
            alert
        };

        events::alert_triggered(&created);
        // The alert is already committed; a delivery failure must not hide it.
        match self.subscribers.deliver(&created).await {
            Ok(delivered) => debug!(alert_id = %created.id, delivered, "alert delivered"),
            Err(e) => warn!(alert_id = %created.id, error = %e, "alert delivery skipped"),
        }
        Ok(TriggerOutcome::Created(created))
    }

    /// Active alerts matching `filter`, most severe first, then newest first.
    pub fn get_active_alerts(&self, filter: &AlertFilter) -> CompatResult<Vec<AlertItem>> {
        let state = self.state()?;
        let mut alerts: Vec<AlertItem> = state
            .active
            .iter()
            .map(|e| &e.alert)
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.triggered_at.cmp(&a.triggered_at))
        });
        Ok(alerts)
    }

    /// Most recent history entries first, any status.
    pub fn get_alert_history(&self, limit: usize) -> CompatResult<Vec<AlertHistoryEntry>> {
        let state = self.state()?;
        Ok(state.history.iter().rev().take(limit).cloned().collect())
    }

    /// Mark an alert acknowledged. Returns `false` if no such alert is active
    /// or it is already resolved. Repeating the call overwrites the notes.
    pub fn acknowledge_alert(&self, id: &str, by: &str, notes: Option<&str>) -> CompatResult<bool> {
        let now = Utc::now();
        let mut state = self.state()?;
        let Some(entry) = state
            .active
            .iter_mut()
            .find(|e| e.alert.id == id && e.alert.status != AlertStatus::Resolved)
        else {
            return Ok(false);
        };
        entry.alert.status = AlertStatus::Acknowledged;

        if let Some(history) = state.history_entry_mut(id) {
            history.alert.status = AlertStatus::Acknowledged;
            history.acknowledged_at = Some(now);
            history.acknowledged_by = Some(by.to_string());
            if let Some(notes) = notes {
                history.notes = Some(notes.to_string());
            }
        }
        events::alert_acknowledged(id, by);
        Ok(true)
    }

    /// Mark an alert resolved. It leaves the active set once the grace period
    /// has elapsed. Returns `false` if no such alert is in the active set.
    pub fn resolve_alert(&self, id: &str, by: &str, notes: Option<&str>) -> CompatResult<bool> {
        let now = Utc::now();
        let mut state = self.state()?;
        let Some(entry) = state.active.iter_mut().find(|e| e.alert.id == id) else {
            return Ok(false);
        };
        let first_resolution = entry.resolved_at.is_none();
        if first_resolution {
            entry.alert.status = AlertStatus::Resolved;
            entry.resolved_at = Some(now);
        }

        if let Some(history) = state.history_entry_mut(id) {
            if first_resolution {
                history.alert.status = AlertStatus::Resolved;
                history.resolved_at = Some(now);
                history.resolved_by = Some(by.to_string());
            }
            if let Some(notes) = notes {
                history.notes = Some(notes.to_string());
            }
        }
        if first_resolution {
            events::alert_resolved(id, by);
        }
        Ok(true)
    }

    /// Drop resolved alerts whose grace period ended at or before `now`.
    /// Returns how many were removed.
    pub fn sweep_resolved(&self, now: DateTime<Utc>) -> CompatResult<usize> {
        let grace = Duration::seconds(self.config.resolved_grace_secs as i64);
        let mut state = self.state()?;
        let before = state.active.len();
        state
            .active
            .retain(|e| e.resolved_at.map_or(true, |at| at + grace > now));
        let swept = before - state.active.len();
        if swept > 0 {
            debug!(swept, "resolved alerts swept from active set");
        }
        Ok(swept)
    }

    /// How many alerts were created for `(alert_type, severity)`.
    pub fn trigger_count(&self, alert_type: AlertType, severity: Severity) -> CompatResult<u64> {
        let state = self.state()?;
        Ok(state
            .trigger_counts
            .get(&(alert_type, severity))
            .copied()
            .unwrap_or(0))
    }

    pub fn get_alert_stats(&self) -> CompatResult<AlertStats> {
        self.stats_at(Utc::now())
    }

    /// Stats with "today" measured from the local midnight before `now`.
    pub fn stats_at(&self, now: DateTime<Utc>) -> CompatResult<AlertStats> {
        let midnight = local_midnight(now);
        let state = self.state()?;

        let mut stats = AlertStats {
            active_count: state
                .active
                .iter()
                .filter(|e| e.alert.status == AlertStatus::Active)
                .count(),
            ..AlertStats::default()
        };

        let mut method_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in state.history.iter().filter(|e| e.alert.triggered_at >= midnight) {
            stats.today_total += 1;
            *stats.today_by_type.entry(entry.alert.alert_type).or_insert(0) += 1;
            *stats
                .today_by_severity
                .entry(entry.alert.severity)
                .or_insert(0) += 1;
            for method in &entry.alert.affected_methods {
                *method_counts.entry(method.as_str()).or_insert(0) += 1;
            }
        }
        let mut top: Vec<(String, usize)> = method_counts
            .into_iter()
            .map(|(m, c)| (m.to_string(), c))
            .collect();
        // BTreeMap order breaks ties alphabetically; the sort is stable.
        top.sort_by(|a, b| b.1.cmp(&a.1));
        top.truncate(self.config.today_top_methods);
        stats.top_affected_methods = top;

        // Over every resolved alert still in history, not just today's.
        let resolutions: Vec<f64> = state
            .history
            .iter()
            .filter_map(AlertHistoryEntry::resolution_minutes)
            .collect();
        if !resolutions.is_empty() {
            stats.avg_resolution_minutes =
                resolutions.iter().sum::<f64>() / resolutions.len() as f64;
        }
        Ok(stats)
    }
}

fn local_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_timezone(&Local)
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or(now - Duration::hours(24))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn candidate(alert_type: AlertType, severity: Severity, actual: f64) -> AlertCandidate {
        AlertCandidate {
            alert_type,
            severity,
            title: format!("{alert_type} breach"),
            description: format!("observed {actual}"),
            threshold: 15.0,
            actual_value: actual,
            affected_methods: BTreeSet::new(),
            recommended_action: "Investigate".to_string(),
        }
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let manager = AlertManager::new(MonitorConfig {
            history_capacity: 2,
            ..MonitorConfig::default()
        });
        for t in [AlertType::ErrorRate, AlertType::Performance, AlertType::MethodUsage] {
            manager
                .trigger_alert(candidate(t, Severity::Warning, 1.0))
                .await
                .unwrap();
        }
        let history = manager.get_alert_history(10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].alert.alert_type, AlertType::MethodUsage);
    }

    #[tokio::test]
    async fn acknowledged_alert_still_deduplicates() {
        let manager = AlertManager::new(MonitorConfig::default());
        let first = manager
            .trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, 20.0))
            .await
            .unwrap();
        assert!(manager
            .acknowledge_alert(&first.alert().id, "ops", None)
            .unwrap());

        let second = manager
            .trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, 30.0))
            .await
            .unwrap();
        assert!(!second.is_created());
        assert_eq!(second.alert().status, AlertStatus::Acknowledged);
        assert_eq!(second.alert().actual_value, 30.0);
    }

    #[tokio::test]
    async fn resolved_alert_does_not_absorb_new_breach() {
        let manager = AlertManager::new(MonitorConfig::default());
        let first = manager
            .trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, 20.0))
            .await
            .unwrap();
        manager
            .resolve_alert(&first.alert().id, "ops", None)
            .unwrap();
        let second = manager
            .trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, 25.0))
            .await
            .unwrap();
        assert!(second.is_created());
        assert_ne!(second.alert().id, first.alert().id);
        assert_eq!(
            manager
                .trigger_count(AlertType::ErrorRate, Severity::Critical)
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn delivery_error_still_reports_created_alert() {
        let manager = AlertManager::new(MonitorConfig::default());
        manager.subscribers.poison_lock();

        let outcome = manager
            .trigger_alert(candidate(AlertType::ErrorRate, Severity::Critical, 20.0))
            .await
            .unwrap();
        assert!(outcome.is_created());
        let history = manager.get_alert_history(10).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].alert.id, outcome.alert().id);
    }

    #[test]
    fn midnight_is_not_after_now() {
        let now = Utc::now();
        let midnight = local_midnight(now);
        assert!(midnight <= now);
        assert!(now - midnight <= Duration::hours(25));
    }
}
