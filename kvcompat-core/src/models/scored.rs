use serde::{Deserialize, Serialize};

/// Ordering requested from a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreOrder {
    Ascending,
    Descending,
}

/// A member of a scored collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

/// A leaderboard row. Rank 1 is the highest score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub member: String,
    pub score: f64,
    pub rank: u64,
}

/// Result of a single-member rank lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rank", rename_all = "snake_case")]
pub enum RankOutcome {
    /// 1-based position computed from a full scan.
    Exact(u64),
    /// The member is not in the collection.
    Absent,
    /// The scan failed; the position is unknown.
    Degraded,
}

impl RankOutcome {
    /// Integer form used by callers: 0 means unknown or absent.
    pub fn as_rank(self) -> u64 {
        match self {
            Self::Exact(rank) => rank,
            Self::Absent | Self::Degraded => 0,
        }
    }
}
