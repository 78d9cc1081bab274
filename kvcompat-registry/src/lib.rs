//! # kvcompat-registry
//!
//! Static classification of every store command the host may or may not
//! provide, and the rule-based validation engine that turns that table into
//! a single verdict per call.

pub mod engine;
pub mod registry;
pub mod rules;
pub mod table;

pub use engine::ValidationEngine;
pub use registry::{MethodRegistry, RegistryReport};
pub use rules::{RuleInput, ValidationRule};
