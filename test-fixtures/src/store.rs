//! In-memory sorted-set store with injectable host restrictions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use kvcompat_core::errors::StoreError;
use kvcompat_core::models::{ScoreOrder, ScoredMember};
use kvcompat_core::traits::IStoreClient;

/// Command names reported in errors and call counts.
pub mod commands {
    pub const RANGE: &str = "zrange";
    pub const SCORE: &str = "zscore";
    pub const CARD: &str = "zcard";
    pub const ADD: &str = "zadd";
    pub const INCR: &str = "zincrby";
}

/// A sorted-set store held in memory.
///
/// Commands can be marked unsupported (they fail with the host's
/// unknown-command message), failures can be scripted per command, and the
/// store can be told to ignore the requested ordering.
#[derive(Default)]
pub struct InMemorySortedSetStore {
    sets: Mutex<HashMap<String, HashMap<String, f64>>>,
    unsupported: Mutex<HashSet<String>>,
    scripted: Mutex<HashMap<String, VecDeque<StoreError>>>,
    calls: Mutex<HashMap<String, usize>>,
    ignore_order: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl InMemorySortedSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection.
    pub fn with_members(self, key: &str, members: &[(&str, f64)]) -> Self {
        {
            let mut sets = self.sets.lock().unwrap();
            let set = sets.entry(key.to_string()).or_default();
            for (member, score) in members {
                set.insert(member.to_string(), *score);
            }
        }
        self
    }

    /// Make `command` fail with an unknown-command error on every call.
    pub fn with_unsupported(self, command: &str) -> Self {
        self.unsupported.lock().unwrap().insert(command.to_string());
        self
    }

    /// Always answer range scans in ascending order.
    pub fn with_ignored_order(self) -> Self {
        self.ignore_order.store(true, Ordering::SeqCst);
        self
    }

    /// Sleep before answering every call.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Queue a failure for the next call of `command`.
    pub fn fail_next(&self, command: &str, error: StoreError) {
        self.scripted
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(error);
    }

    /// Number of calls made to `command`, including failed ones.
    pub fn calls(&self, command: &str) -> usize {
        self.calls.lock().unwrap().get(command).copied().unwrap_or(0)
    }

    /// Current score of a member, bypassing restrictions.
    pub fn peek(&self, key: &str, member: &str) -> Option<f64> {
        self.sets
            .lock()
            .unwrap()
            .get(key)
            .and_then(|set| set.get(member).copied())
    }

    async fn enter(&self, command: &str) -> Result<(), StoreError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_insert(0) += 1;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(VecDeque::pop_front)
        {
            return Err(err);
        }
        if self.unsupported.lock().unwrap().contains(command) {
            return Err(StoreError::from_message(
                command,
                format!("ERR unknown command '{command}'"),
            ));
        }
        Ok(())
    }
}

/// Resolve an inclusive, possibly negative index range against `len`.
fn slice_bounds(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl IStoreClient for InMemorySortedSetStore {
    async fn range_with_scores(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: ScoreOrder,
    ) -> Result<Vec<ScoredMember>, StoreError> {
        self.enter(commands::RANGE).await?;

        let mut members: Vec<ScoredMember> = self
            .sets
            .lock()
            .unwrap()
            .get(key)
            .map(|set| {
                set.iter()
                    .map(|(m, s)| ScoredMember::new(m.clone(), *s))
                    .collect()
            })
            .unwrap_or_default();

        // Ascending by score, ties by member name.
        members.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.member.cmp(&b.member))
        });
        if order == ScoreOrder::Descending && !self.ignore_order.load(Ordering::SeqCst) {
            members.reverse();
        }

        Ok(match slice_bounds(members.len(), start, stop) {
            Some((from, to)) => members[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        self.enter(commands::SCORE).await?;
        Ok(self.peek(key, member))
    }

    async fn cardinality(&self, key: &str) -> Result<u64, StoreError> {
        self.enter(commands::CARD).await?;
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(key)
            .map(|set| set.len() as u64)
            .unwrap_or(0))
    }

    async fn add_score(&self, key: &str, member: &str, score: f64) -> Result<(), StoreError> {
        self.enter(commands::ADD).await?;
        self.sets
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn increment_score(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, StoreError> {
        self.enter(commands::INCR).await?;
        let mut sets = self.sets.lock().unwrap();
        let score = sets
            .entry(key.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0.0);
        *score += delta;
        Ok(*score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_bounds_follow_inclusive_negative_indexing() {
        assert_eq!(slice_bounds(3, 0, -1), Some((0, 2)));
        assert_eq!(slice_bounds(3, 0, 9), Some((0, 2)));
        assert_eq!(slice_bounds(3, 1, 1), Some((1, 1)));
        assert_eq!(slice_bounds(3, -2, -1), Some((1, 2)));
        assert_eq!(slice_bounds(3, 5, 9), None);
        assert_eq!(slice_bounds(0, 0, -1), None);
    }

    #[tokio::test]
    async fn descending_range_puts_highest_first() {
        let store = InMemorySortedSetStore::new().with_members(
            "lb",
            &[("bob", 30.0), ("carol", 40.0), ("alice", 50.0)],
        );
        let top = store
            .range_with_scores("lb", 0, 1, ScoreOrder::Descending)
            .await
            .unwrap();
        let names: Vec<_> = top.iter().map(|m| m.member.as_str()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }

    #[tokio::test]
    async fn scripted_failure_is_consumed_once() {
        let store = InMemorySortedSetStore::new();
        store.fail_next(commands::CARD, StoreError::timeout(commands::CARD, 5));
        assert!(store.cardinality("lb").await.is_err());
        assert_eq!(store.cardinality("lb").await.unwrap(), 0);
        assert_eq!(store.calls(commands::CARD), 2);
    }
}
