pub mod alert_notifier;
pub mod metrics_source;
pub mod store_client;
pub mod telemetry_sink;

pub use alert_notifier::IAlertNotifier;
pub use metrics_source::IMetricsSource;
pub use store_client::IStoreClient;
pub use telemetry_sink::ITelemetrySink;
