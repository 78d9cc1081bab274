//! Error handling for the compatibility layer.
//! One error enum per subsystem, `thiserror` only.

pub mod alert_error;
pub mod compat_error;
pub mod config_error;
pub mod store_error;

pub use alert_error::AlertError;
pub use compat_error::{CompatError, CompatResult};
pub use config_error::ConfigError;
pub use store_error::{StoreError, StoreErrorKind};
