use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{ScoreOrder, ScoredMember};

/// The restricted store, as seen by this layer.
///
/// Implementations are the lowest-level adapter and must tag every failure
/// with a [`crate::errors::StoreErrorKind`]. No rank-by-score primitive is
/// exposed; ranks are derived from range scans.
#[async_trait]
pub trait IStoreClient: Send + Sync {
    /// Members between `start` and `stop` (inclusive, negative indexes count
    /// from the end) in the requested score order.
    async fn range_with_scores(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: ScoreOrder,
    ) -> Result<Vec<ScoredMember>, StoreError>;

    /// Raw score of a member, `None` if absent.
    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError>;

    /// Number of members in the collection.
    async fn cardinality(&self, key: &str) -> Result<u64, StoreError>;

    /// Set a member's score, inserting it if needed.
    async fn add_score(&self, key: &str, member: &str, score: f64) -> Result<(), StoreError>;

    /// Add `delta` to a member's score and return the new score.
    async fn increment_score(&self, key: &str, member: &str, delta: f64)
        -> Result<f64, StoreError>;
}
