//! # kvcompat-observability
//!
//! Structured tracing with span definitions and event helpers, and the
//! in-memory [`MetricsCollector`] that the executor reports into and the
//! alert monitor polls.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::MetricsCollector;
