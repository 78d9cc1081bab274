//! Span definitions per operation: storage attempts, rank lookups, monitor ticks.

/// Create a span around a single storage attempt.
#[macro_export]
macro_rules! storage_span {
    ($operation:expr, $method:expr) => {
        tracing::info_span!("kvcompat.storage", operation = %$operation, method = %$method)
    };
}

/// Create a span around a rank computation.
#[macro_export]
macro_rules! ranking_span {
    ($key:expr) => {
        tracing::info_span!("kvcompat.ranking", key = %$key)
    };
}

/// Create a span around one alert evaluation tick.
#[macro_export]
macro_rules! monitor_tick_span {
    ($tick:expr) => {
        tracing::info_span!("kvcompat.monitor_tick", tick = $tick)
    };
}

