use super::{AlertError, ConfigError, StoreError, StoreErrorKind};

/// Top-level error for the compatibility layer.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("alert error: {0}")]
    AlertError(#[from] AlertError),

    #[error("call to {method} rejected: {reason}")]
    Rejected { method: String, reason: String },

    #[error("score write to {key} for {member} failed: {source}")]
    WriteFailed {
        key: String,
        member: String,
        #[source]
        source: Box<CompatError>,
    },

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CompatError {
    /// The store error kind, if this error originated in the storage adapter.
    pub fn store_kind(&self) -> Option<StoreErrorKind> {
        match self {
            Self::StoreError(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Whether local fallback recovery is allowed for this error.
    /// Only compatibility-class store failures qualify.
    pub fn is_compatibility(&self) -> bool {
        self.store_kind()
            .map(|kind| kind.is_compatibility())
            .unwrap_or(false)
    }
}

/// Convenience alias used across all crates.
pub type CompatResult<T> = Result<T, CompatError>;
