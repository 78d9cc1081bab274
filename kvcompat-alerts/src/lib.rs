//! # kvcompat-alerts
//!
//! Threshold alerting over the metrics collaborator: the [`AlertManager`]
//! lifecycle (active → acknowledged → resolved), subscriber fan-out, the four
//! evaluators, and the periodic [`AlertMonitor`].

pub mod evaluators;
pub mod manager;
pub mod monitor;
pub mod subscribers;

pub use manager::{AlertManager, TriggerOutcome};
pub use monitor::{AlertMonitor, MonitorHandle, TickReport};
pub use subscribers::{AlertSubscriber, SubscriberRegistry};
