//! Score writes to ranked collections.
//!
//! Unlike reads, a write that cannot be completed is a hard error: a dropped
//! score silently corrupts every later rank computation.

use std::sync::Arc;

use tracing::error;

use kvcompat_core::errors::{CompatError, CompatResult};
use kvcompat_core::traits::IStoreClient;

use crate::executor::ResilienceExecutor;

/// Writes scores through the executor.
///
/// The fallback legs are read-modify-write sequences and are not atomic.
/// Concurrent writers to the same member must be serialized by the caller.
pub struct ScoreWriter {
    store: Arc<dyn IStoreClient>,
    executor: Arc<ResilienceExecutor>,
}

impl ScoreWriter {
    pub fn new(store: Arc<dyn IStoreClient>, executor: Arc<ResilienceExecutor>) -> Self {
        Self { store, executor }
    }

    /// Set `member`'s score to `score`.
    ///
    /// Falls back to an increment by the difference from the current score
    /// when the host lacks a direct set.
    pub async fn record_score(&self, key: &str, member: &str, score: f64) -> CompatResult<()> {
        let params = [key.to_string(), score.to_string(), member.to_string()];
        self.executor
            .execute_with_fallback(
                "record_score",
                "zadd",
                "zincrby",
                &params,
                move || async move {
                    Ok::<_, CompatError>(self.store.add_score(key, member, score).await?)
                },
                move || async move {
                    let current = self.store.score(key, member).await?.unwrap_or(0.0);
                    self.store
                        .increment_score(key, member, score - current)
                        .await?;
                    Ok::<_, CompatError>(())
                },
            )
            .await
            .map_err(|source| write_failed(key, member, source))
    }

    /// Add `delta` to `member`'s score and return the new score.
    ///
    /// Falls back to read, add, write when the host lacks an increment.
    pub async fn increment_score(&self, key: &str, member: &str, delta: f64) -> CompatResult<f64> {
        let params = [key.to_string(), delta.to_string(), member.to_string()];
        self.executor
            .execute_with_fallback(
                "increment_score",
                "zincrby",
                "zadd",
                &params,
                move || async move {
                    Ok::<_, CompatError>(self.store.increment_score(key, member, delta).await?)
                },
                move || async move {
                    let current = self.store.score(key, member).await?.unwrap_or(0.0);
                    let updated = current + delta;
                    self.store.add_score(key, member, updated).await?;
                    Ok::<_, CompatError>(updated)
                },
            )
            .await
            .map_err(|source| write_failed(key, member, source))
    }
}

fn write_failed(key: &str, member: &str, source: CompatError) -> CompatError {
    error!(key, member, error = %source, "score write failed");
    CompatError::WriteFailed {
        key: key.to_string(),
        member: member.to_string(),
        source: Box::new(source),
    }
}
