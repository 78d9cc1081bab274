//! Configuration for the compatibility layer.
//! TOML-based, every section defaulted. Loaded once at startup, immutable after.

pub mod defaults;
pub mod executor_config;
pub mod logging_config;
pub mod monitor_config;
pub mod ranking_config;
pub mod threshold_config;

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use executor_config::ExecutorConfig;
pub use logging_config::LoggingConfig;
pub use monitor_config::MonitorConfig;
pub use ranking_config::RankingConfig;
pub use threshold_config::{ThresholdConfig, ThresholdPair};

use crate::errors::ConfigError;
use crate::models::{HostStatus, MethodDescriptor};

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompatConfig {
    pub monitor: MonitorConfig,
    pub thresholds: ThresholdConfig,
    pub executor: ExecutorConfig,
    pub ranking: RankingConfig,
    pub logging: LoggingConfig,
    /// Descriptor overrides merged over the built-in method table by name.
    pub methods: Vec<MethodDescriptor>,
}

impl CompatConfig {
    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, pair) in self.thresholds.pairs() {
            if !pair.warning.is_finite() || !pair.critical.is_finite() {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "thresholds must be finite numbers".to_string(),
                });
            }
            if pair.warning < 0.0 || pair.critical < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "thresholds must be non-negative".to_string(),
                });
            }
            if pair.warning >= pair.critical {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: format!(
                        "warning ({}) must be below critical ({})",
                        pair.warning, pair.critical
                    ),
                });
            }
        }
        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "monitor.interval_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.monitor.history_capacity == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "monitor.history_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.monitor.delivery_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "monitor.delivery_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.executor.operation_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "executor.operation_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            let name = method.name.to_ascii_lowercase();
            if !seen.insert(name.clone()) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("methods.{name}"),
                    message: "method listed more than once".to_string(),
                });
            }
            let contradicts = match method.host_status {
                HostStatus::Supported => !method.supported,
                HostStatus::Unsupported => method.supported,
                HostStatus::Unknown | HostStatus::Deprecated => false,
            };
            if contradicts {
                return Err(ConfigError::ValidationFailed {
                    field: format!("methods.{name}"),
                    message: "supported flag contradicts host_status".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_secs)
    }

    pub fn resolved_grace(&self) -> Duration {
        Duration::from_secs(self.monitor.resolved_grace_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        self.executor.operation_timeout()
    }
}
