//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use kvcompat_core::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV_VAR: &str = "KVCOMPAT_LOG";

/// Install the default subscriber: JSON lines at `info`, overridable through
/// `KVCOMPAT_LOG`. Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    init_tracing_from_config(&LoggingConfig::default())
}

/// Initialize tracing from the logging section of the config.
///
/// `KVCOMPAT_LOG` still wins over the configured level. Returns `false` if a
/// global subscriber was already installed.
pub fn init_tracing_from_config(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
