//! # kvcompat-core
//!
//! Foundation crate for the store compatibility layer.
//! Defines all types, traits, errors, config, and constants shared by the
//! registry, resilience, observability, and alerting crates.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CompatConfig;
pub use errors::{CompatError, CompatResult, StoreError, StoreErrorKind};
pub use models::{MethodDescriptor, Severity};
