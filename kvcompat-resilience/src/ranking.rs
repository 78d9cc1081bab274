//! Rank lookups built only from range scans.
//!
//! The host has no rank-by-score primitive. A single member's rank costs one
//! full scan of the collection; a top-K leaderboard costs one bounded scan.
//! Rank 1 is the highest score. Read paths never fail: they degrade to
//! [`RankOutcome::Degraded`], [`RankOutcome::Absent`] or an empty board.

use std::sync::Arc;

use tracing::{warn, Instrument};

use kvcompat_core::config::RankingConfig;
use kvcompat_core::errors::{CompatError, CompatResult};
use kvcompat_core::models::{RankOutcome, RankedEntry, ScoreOrder, ScoredMember};
use kvcompat_core::traits::IStoreClient;
use kvcompat_observability::ranking_span;
use kvcompat_observability::tracing_setup::events;

use crate::executor::ResilienceExecutor;

const RANGE_METHOD: &str = "zrange";
const SCORE_METHOD: &str = "zscore";

pub struct RankingEngine {
    store: Arc<dyn IStoreClient>,
    executor: Arc<ResilienceExecutor>,
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(
        store: Arc<dyn IStoreClient>,
        executor: Arc<ResilienceExecutor>,
        config: RankingConfig,
    ) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    /// 1-based rank of `member`, or 0 when absent or unknown.
    pub async fn get_player_rank(&self, key: &str, member: &str) -> u64 {
        self.rank_detail(key, member).await.as_rank()
    }

    /// Rank of `member` with the reason a number could not be produced.
    pub async fn rank_detail(&self, key: &str, member: &str) -> RankOutcome {
        let params = [key.to_string(), "0".to_string(), "-1".to_string()];
        let result = self
            .executor
            .execute_with_fallback(
                "get_player_rank",
                RANGE_METHOD,
                SCORE_METHOD,
                &params,
                move || async move {
                    let members = self.scan(key, 0, -1).await?.members;
                    Ok::<_, CompatError>(position_of(&members, member))
                },
                // Without a scan the position is unknowable; only presence is.
                move || async move {
                    Ok::<_, CompatError>(match self.store.score(key, member).await? {
                        Some(_) => RankOutcome::Degraded,
                        None => RankOutcome::Absent,
                    })
                },
            )
            .instrument(ranking_span!(key))
            .await;

        match result {
            Ok(RankOutcome::Degraded) => {
                events::rank_degraded(key, member, "range scan unavailable on host");
                RankOutcome::Degraded
            }
            Ok(outcome) => outcome,
            Err(err) => {
                events::rank_degraded(key, member, &err.to_string());
                RankOutcome::Degraded
            }
        }
    }

    /// Top `limit` members with contiguous ranks starting at 1.
    ///
    /// A failed fetch is retried once with a smaller bound; a second failure
    /// yields an empty board.
    pub async fn get_leaderboard_with_ranks(&self, key: &str, limit: usize) -> Vec<RankedEntry> {
        if limit == 0 {
            return Vec::new();
        }
        let span = ranking_span!(key);
        let err = match self.top(key, limit).instrument(span.clone()).await {
            Ok(board) => return board,
            Err(err) => err,
        };

        let retry = limit.min(self.config.leaderboard_retry_limit);
        warn!(key, limit, retry, error = %err, "leaderboard fetch failed, retrying with a smaller bound");
        if retry == 0 {
            return Vec::new();
        }
        match self.top(key, retry).instrument(span).await {
            Ok(board) => board,
            Err(err) => {
                warn!(key, retry, error = %err, "leaderboard retry failed, returning empty board");
                Vec::new()
            }
        }
    }

    async fn top(&self, key: &str, limit: usize) -> CompatResult<Vec<RankedEntry>> {
        // Any limit past i64 covers the whole collection.
        let stop = i64::try_from(limit).map_or(-1, |l| l - 1);
        let params = [key.to_string(), "0".to_string(), stop.to_string()];
        let mut scan = self
            .executor
            .execute("get_leaderboard", RANGE_METHOD, &params, move || {
                self.scan(key, 0, stop)
            })
            .await?;

        // A slice taken from the wrong end cannot be repaired by sorting it.
        if !scan.was_ordered {
            let all = [key.to_string(), "0".to_string(), "-1".to_string()];
            scan = self
                .executor
                .execute("get_leaderboard", RANGE_METHOD, &all, move || {
                    self.scan(key, 0, -1)
                })
                .await?;
        }

        let mut members = scan.members;
        members.truncate(limit);
        Ok(assign_ranks(members))
    }

    /// Descending range scan, re-sorted if the store ignored the ordering.
    async fn scan(&self, key: &str, start: i64, stop: i64) -> CompatResult<Scan> {
        let mut members = self
            .store
            .range_with_scores(key, start, stop, ScoreOrder::Descending)
            .await?;
        let was_ordered = is_descending(&members);
        if !was_ordered {
            warn!(
                key,
                start,
                stop,
                "range reply not in descending score order, re-sorting"
            );
            sort_descending(&mut members);
        }
        Ok(Scan {
            members,
            was_ordered,
        })
    }
}

struct Scan {
    members: Vec<ScoredMember>,
    was_ordered: bool,
}

fn is_descending(members: &[ScoredMember]) -> bool {
    members.windows(2).all(|pair| pair[0].score >= pair[1].score)
}

/// Stable: equal scores keep the store's order.
fn sort_descending(members: &mut [ScoredMember]) {
    members.sort_by(|a, b| b.score.total_cmp(&a.score));
}

fn position_of(members: &[ScoredMember], member: &str) -> RankOutcome {
    members
        .iter()
        .position(|m| m.member == member)
        .map(|index| RankOutcome::Exact(index as u64 + 1))
        .unwrap_or(RankOutcome::Absent)
}

fn assign_ranks(members: Vec<ScoredMember>) -> Vec<RankedEntry> {
    members
        .into_iter()
        .enumerate()
        .map(|(index, m)| RankedEntry {
            member: m.member,
            score: m.score,
            rank: index as u64 + 1,
        })
        .collect()
}
