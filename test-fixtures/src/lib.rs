//! Shared test doubles for the kvcompat workspace.

pub mod metrics;
pub mod store;
pub mod subscribers;

pub use metrics::StaticMetricsSource;
pub use store::{commands, InMemorySortedSetStore};
pub use subscribers::{
    FailingSubscriber, HangingSubscriber, PanickingSubscriber, RecordingSubscriber,
};
