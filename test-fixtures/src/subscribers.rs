//! Alert notifiers for delivery tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use kvcompat_core::errors::AlertError;
use kvcompat_core::models::AlertItem;
use kvcompat_core::traits::IAlertNotifier;

/// Keeps every alert it receives.
#[derive(Debug, Default)]
pub struct RecordingSubscriber {
    received: Mutex<Vec<AlertItem>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<AlertItem> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl IAlertNotifier for RecordingSubscriber {
    async fn notify(&self, alert: &AlertItem) -> Result<(), AlertError> {
        self.received.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

/// Fails every delivery.
#[derive(Debug, Default)]
pub struct FailingSubscriber {
    attempts: Mutex<usize>,
}

impl FailingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl IAlertNotifier for FailingSubscriber {
    async fn notify(&self, alert: &AlertItem) -> Result<(), AlertError> {
        *self.attempts.lock().unwrap() += 1;
        Err(AlertError::DeliveryFailed {
            subscriber: "failing".to_string(),
            reason: format!("webhook unreachable for {}", alert.id),
        })
    }
}

/// Panics on every delivery.
#[derive(Debug, Default)]
pub struct PanickingSubscriber {
    attempts: AtomicUsize,
}

impl PanickingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IAlertNotifier for PanickingSubscriber {
    async fn notify(&self, alert: &AlertItem) -> Result<(), AlertError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        panic!("notifier crashed on {}", alert.id);
    }
}

/// Never completes a delivery.
#[derive(Debug, Default)]
pub struct HangingSubscriber {
    attempts: AtomicUsize,
}

impl HangingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IAlertNotifier for HangingSubscriber {
    async fn notify(&self, _alert: &AlertItem) -> Result<(), AlertError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}
