/// Alert subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("subscriber {subscriber} failed: {reason}")]
    DeliveryFailed { subscriber: String, reason: String },

    #[error("subscriber already registered: {id}")]
    DuplicateSubscriber { id: String },

    #[error("alert monitor already running")]
    MonitorAlreadyRunning,
}
