//! Alert subscribers and fan-out delivery.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use tracing::debug;

use kvcompat_core::config::defaults::DEFAULT_DELIVERY_TIMEOUT_MS;
use kvcompat_core::errors::{AlertError, CompatError, CompatResult};
use kvcompat_core::models::{AlertItem, AlertType, Severity};
use kvcompat_core::traits::IAlertNotifier;
use kvcompat_observability::tracing_setup::events;

/// A registered alert consumer.
#[derive(Clone)]
pub struct AlertSubscriber {
    pub id: String,
    pub name: String,
    /// Only alerts at or above this severity are delivered.
    pub min_severity: Option<Severity>,
    /// Only alerts of this type are delivered.
    pub alert_type: Option<AlertType>,
    pub notifier: Arc<dyn IAlertNotifier>,
}

impl AlertSubscriber {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        notifier: Arc<dyn IAlertNotifier>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_severity: None,
            alert_type: None,
            notifier,
        }
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    pub fn with_alert_type(mut self, alert_type: AlertType) -> Self {
        self.alert_type = Some(alert_type);
        self
    }

    pub fn admits(&self, alert: &AlertItem) -> bool {
        self.min_severity.map_or(true, |min| alert.severity >= min)
            && self.alert_type.map_or(true, |t| t == alert.alert_type)
    }
}

impl std::fmt::Debug for AlertSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertSubscriber")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("min_severity", &self.min_severity)
            .field("alert_type", &self.alert_type)
            .finish()
    }
}

/// Process-wide subscriber list.
#[derive(Debug)]
pub struct SubscriberRegistry {
    subscribers: RwLock<Vec<AlertSubscriber>>,
    delivery_timeout: Duration,
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::with_timeout(Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS))
    }
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that abandons any single delivery after `delivery_timeout`.
    pub fn with_timeout(delivery_timeout: Duration) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            delivery_timeout,
        }
    }

    pub fn subscribe(&self, subscriber: AlertSubscriber) -> CompatResult<()> {
        let mut subs = self.subscribers.write().map_err(|e| {
            CompatError::ConcurrencyError(format!("subscriber lock: {e}"))
        })?;
        if subs.iter().any(|s| s.id == subscriber.id) {
            return Err(AlertError::DuplicateSubscriber { id: subscriber.id }.into());
        }
        debug!(subscriber = %subscriber.id, name = %subscriber.name, "alert subscriber registered");
        subs.push(subscriber);
        Ok(())
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: &str) -> CompatResult<bool> {
        let mut subs = self.subscribers.write().map_err(|e| {
            CompatError::ConcurrencyError(format!("subscriber lock: {e}"))
        })?;
        let before = subs.len();
        subs.retain(|s| s.id != id);
        let removed = subs.len() != before;
        if removed {
            debug!(subscriber = %id, "alert subscriber removed");
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching(&self, alert: &AlertItem) -> CompatResult<Vec<AlertSubscriber>> {
        let subs = self.subscribers.read().map_err(|e| {
            CompatError::ConcurrencyError(format!("subscriber lock: {e}"))
        })?;
        Ok(subs.iter().filter(|s| s.admits(alert)).cloned().collect())
    }

    /// Notify every admitting subscriber concurrently.
    ///
    /// A delivery that errors, panics or outlives the delivery timeout is
    /// logged and does not affect the others. Returns the number of
    /// successful deliveries.
    pub async fn deliver(&self, alert: &AlertItem) -> CompatResult<usize> {
        let targets = self.matching(alert)?;
        let results = join_all(targets.iter().map(|s| {
            let guarded = AssertUnwindSafe(s.notifier.notify(alert)).catch_unwind();
            tokio::time::timeout(self.delivery_timeout, guarded)
        }))
        .await;

        let mut delivered = 0;
        for (subscriber, result) in targets.iter().zip(results) {
            let failure = match result {
                Ok(Ok(Ok(()))) => {
                    delivered += 1;
                    continue;
                }
                Ok(Ok(Err(e))) => e.to_string(),
                Ok(Err(panic)) => format!("notifier panicked: {}", panic_message(&*panic)),
                Err(_) => format!(
                    "delivery timed out after {}ms",
                    self.delivery_timeout.as_millis()
                ),
            };
            events::subscriber_failed(&subscriber.id, &alert.id, &failure);
        }
        Ok(delivered)
    }

    #[cfg(test)]
    pub(crate) fn poison_lock(&self) {
        let _ = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = self.subscribers.write();
            panic!("subscriber lock poisoned");
        }));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
