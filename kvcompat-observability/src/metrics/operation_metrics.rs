//! Sliding window of storage attempts: error rate, latency, per-method counts.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use kvcompat_core::models::OperationRecord;

/// Operation-level metrics over a bounded window.
#[derive(Debug, Clone, Serialize)]
pub struct OperationMetrics {
    /// Most recent attempts, oldest first.
    #[serde(skip)]
    window: VecDeque<OperationRecord>,
    max_window: usize,
    /// Lifetime attempt count per method.
    pub counts_by_method: BTreeMap<String, u64>,
    pub total_attempts: u64,
    pub total_failures: u64,
    pub total_fallbacks: u64,
}

impl OperationMetrics {
    pub fn new(max_window: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(max_window.min(1024)),
            max_window: max_window.max(1),
            counts_by_method: BTreeMap::new(),
            total_attempts: 0,
            total_failures: 0,
            total_fallbacks: 0,
        }
    }

    pub fn record(&mut self, record: &OperationRecord) {
        self.total_attempts += 1;
        if !record.success {
            self.total_failures += 1;
        }
        if record.fallback {
            self.total_fallbacks += 1;
        }
        *self
            .counts_by_method
            .entry(record.method.to_ascii_lowercase())
            .or_insert(0) += 1;

        self.window.push_back(record.clone());
        while self.window.len() > self.max_window {
            self.window.pop_front();
        }
    }

    /// Failed attempts in the window, as a percentage.
    pub fn error_rate(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        let failed = self.window.iter().filter(|r| !r.success).count();
        failed as f64 * 100.0 / self.window.len() as f64
    }

    /// Mean attempt duration in the window, in milliseconds.
    pub fn average_response_time_ms(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .window
            .iter()
            .map(|r| r.duration.as_secs_f64() * 1000.0)
            .sum();
        total / self.window.len() as f64
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn recent(&self, limit: usize) -> Vec<OperationRecord> {
        self.window.iter().rev().take(limit).cloned().collect()
    }
}
