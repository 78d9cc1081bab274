use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Resilience executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Upper bound on a single storage attempt, in milliseconds.
    pub operation_timeout_ms: u64,
    /// Run pre-flight validation before every primary attempt.
    pub validate_before_execute: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: defaults::DEFAULT_OPERATION_TIMEOUT_MS,
            validate_before_execute: defaults::DEFAULT_VALIDATE_BEFORE_EXECUTE,
        }
    }
}

impl ExecutorConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
