use serde::{Deserialize, Serialize};

use super::defaults;

/// Alternative ranking engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Bound used for the single leaderboard retry after a failed fetch.
    pub leaderboard_retry_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            leaderboard_retry_limit: defaults::DEFAULT_LEADERBOARD_RETRY_LIMIT,
        }
    }
}
