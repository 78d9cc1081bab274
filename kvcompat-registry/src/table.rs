//! Built-in method table for the restricted host.
//!
//! Covers every command the application layer is known to reach for. Commands
//! missing from this table are "unknown" to the registry and only produce a
//! validation warning.

use kvcompat_core::models::MethodCategory::{
    Generic, Hash, List, Set, SortedSet, Stream, String as Str,
};
use kvcompat_core::models::{
    AccuracyLevel, HostStatus, MethodDescriptor, PerformanceImpact, RiskLevel,
    SubstitutionDescriptor, SubstitutionStrategy,
};

fn substitute(
    target: &str,
    strategy: SubstitutionStrategy,
    impact: PerformanceImpact,
    accuracy: AccuracyLevel,
    example: &str,
) -> SubstitutionDescriptor {
    SubstitutionDescriptor {
        target_method: target.to_string(),
        strategy,
        performance_impact: impact,
        accuracy,
        example: example.to_string(),
    }
}

/// The default descriptor set, loaded once at startup.
pub fn default_methods() -> Vec<MethodDescriptor> {
    vec![
        // --- String ---
        MethodDescriptor::supported("get", Str, "Read a string value"),
        MethodDescriptor::supported("set", Str, "Write a string value"),
        MethodDescriptor::supported("mget", Str, "Read several string values"),
        MethodDescriptor::supported("mset", Str, "Write several string values"),
        MethodDescriptor::supported("incrby", Str, "Increment an integer value"),
        MethodDescriptor::supported("getrange", Str, "Read a substring"),
        MethodDescriptor::supported("setrange", Str, "Overwrite part of a string"),
        MethodDescriptor::supported("strlen", Str, "Length of a string value"),
        MethodDescriptor::unsupported(
            "getdel",
            Str,
            RiskLevel::Low,
            "Read and delete atomically",
            "Use get followed by del inside a transaction",
        )
        .with_substitution(substitute(
            "get",
            SubstitutionStrategy::MultiStep,
            PerformanceImpact::Minimal,
            AccuracyLevel::Exact,
            "multi(); get(key); del(key); exec()",
        )),
        // --- Hash ---
        MethodDescriptor::supported("hget", Hash, "Read a hash field"),
        MethodDescriptor::supported("hset", Hash, "Write hash fields"),
        MethodDescriptor::supported("hmget", Hash, "Read several hash fields"),
        MethodDescriptor::supported("hdel", Hash, "Delete hash fields"),
        MethodDescriptor::supported("hgetall", Hash, "Read a whole hash"),
        MethodDescriptor::supported("hkeys", Hash, "List hash fields"),
        MethodDescriptor::supported("hlen", Hash, "Number of hash fields"),
        MethodDescriptor::supported("hincrby", Hash, "Increment a hash field"),
        MethodDescriptor::supported("hmset", Hash, "Write several hash fields")
            .with_host_status(HostStatus::Deprecated),
        MethodDescriptor::unsupported(
            "hscan",
            Hash,
            RiskLevel::Medium,
            "Iterate hash fields incrementally",
            "Use hgetall for small hashes or hkeys with hmget",
        )
        .with_substitution(substitute(
            "hgetall",
            SubstitutionStrategy::DirectReplacement,
            PerformanceImpact::Moderate,
            AccuracyLevel::Exact,
            "hgetall(key)",
        )),
        // --- Sorted set ---
        MethodDescriptor::supported("zadd", SortedSet, "Add or update scored members"),
        MethodDescriptor::supported(
            "zrange",
            SortedSet,
            "Range scan by index, with optional reverse ordering",
        ),
        MethodDescriptor::supported("zrangebyscore", SortedSet, "Range scan by score"),
        MethodDescriptor::supported("zscore", SortedSet, "Read a member's score"),
        MethodDescriptor::supported("zcard", SortedSet, "Number of members"),
        MethodDescriptor::supported("zincrby", SortedSet, "Increment a member's score"),
        MethodDescriptor::supported("zrem", SortedSet, "Remove members"),
        MethodDescriptor::supported(
            "zremrangebyrank",
            SortedSet,
            "Remove members by index range",
        ),
        MethodDescriptor::supported(
            "zrevrange",
            SortedSet,
            "Range scan by index in descending score order",
        ),
        MethodDescriptor::unsupported(
            "zrank",
            SortedSet,
            RiskLevel::High,
            "1-based position of a member, ascending",
            "Scan the collection with zrange and locate the member",
        )
        .with_substitution(substitute(
            "zrange",
            SubstitutionStrategy::AlgorithmBased,
            PerformanceImpact::Significant,
            AccuracyLevel::Exact,
            "zrange(key, 0, -1) then position of member + 1",
        )),
        MethodDescriptor::unsupported(
            "zrevrank",
            SortedSet,
            RiskLevel::High,
            "1-based position of a member, descending",
            "Scan the collection with reversed zrange and locate the member",
        )
        .with_substitution(substitute(
            "zrange",
            SubstitutionStrategy::AlgorithmBased,
            PerformanceImpact::Significant,
            AccuracyLevel::Exact,
            "zrange(key, 0, -1, { reverse: true }) then position of member + 1",
        )),
        MethodDescriptor::unsupported(
            "zcount",
            SortedSet,
            RiskLevel::Medium,
            "Count members in a score range",
            "Use zrangebyscore and count the result",
        )
        .with_substitution(substitute(
            "zrangebyscore",
            SubstitutionStrategy::AlgorithmBased,
            PerformanceImpact::Moderate,
            AccuracyLevel::Exact,
            "zrangebyscore(key, min, max).length",
        )),
        MethodDescriptor::unsupported(
            "zunionstore",
            SortedSet,
            RiskLevel::Critical,
            "Union of sorted sets into a destination key",
            "Redesign: merge collections in application code",
        ),
        MethodDescriptor::unsupported(
            "zinterstore",
            SortedSet,
            RiskLevel::Critical,
            "Intersection of sorted sets into a destination key",
            "Redesign: intersect collections in application code",
        ),
        // --- List ---
        MethodDescriptor::unsupported(
            "lpush",
            List,
            RiskLevel::High,
            "Prepend to a list",
            "Model the list as a sorted set keyed by insertion time",
        )
        .with_substitution(substitute(
            "zadd",
            SubstitutionStrategy::MultiStep,
            PerformanceImpact::Minimal,
            AccuracyLevel::Exact,
            "zadd(key, { member, score: -Date.now() })",
        )),
        MethodDescriptor::unsupported(
            "rpush",
            List,
            RiskLevel::High,
            "Append to a list",
            "Model the list as a sorted set keyed by insertion time",
        )
        .with_substitution(substitute(
            "zadd",
            SubstitutionStrategy::MultiStep,
            PerformanceImpact::Minimal,
            AccuracyLevel::Exact,
            "zadd(key, { member, score: Date.now() })",
        )),
        MethodDescriptor::unsupported(
            "lrange",
            List,
            RiskLevel::High,
            "Read a list slice",
            "Read the backing sorted set with zrange",
        )
        .with_substitution(substitute(
            "zrange",
            SubstitutionStrategy::DirectReplacement,
            PerformanceImpact::None,
            AccuracyLevel::Exact,
            "zrange(key, start, stop)",
        )),
        // --- Set ---
        MethodDescriptor::unsupported(
            "sadd",
            Set,
            RiskLevel::Medium,
            "Add set members",
            "Model the set as a hash with empty values",
        )
        .with_substitution(substitute(
            "hset",
            SubstitutionStrategy::DirectReplacement,
            PerformanceImpact::None,
            AccuracyLevel::Exact,
            "hset(key, { [member]: '1' })",
        )),
        MethodDescriptor::unsupported(
            "smembers",
            Set,
            RiskLevel::Medium,
            "Read all set members",
            "Read the backing hash fields",
        )
        .with_substitution(substitute(
            "hkeys",
            SubstitutionStrategy::DirectReplacement,
            PerformanceImpact::None,
            AccuracyLevel::Exact,
            "hkeys(key)",
        )),
        MethodDescriptor::unsupported(
            "sismember",
            Set,
            RiskLevel::Low,
            "Set membership test",
            "Check the backing hash field",
        )
        .with_substitution(substitute(
            "hget",
            SubstitutionStrategy::DirectReplacement,
            PerformanceImpact::None,
            AccuracyLevel::Exact,
            "hget(key, member) !== undefined",
        )),
        // --- Stream ---
        MethodDescriptor::unsupported(
            "xadd",
            Stream,
            RiskLevel::High,
            "Append to a stream",
            "Streams are unavailable; persist events in a sorted set",
        ),
        MethodDescriptor::unsupported(
            "xrange",
            Stream,
            RiskLevel::High,
            "Read a stream range",
            "Streams are unavailable; read events from a sorted set",
        ),
        // --- Generic ---
        MethodDescriptor::supported("del", Generic, "Delete keys"),
        MethodDescriptor::supported("exists", Generic, "Key existence test"),
        MethodDescriptor::supported("expire", Generic, "Set a key TTL"),
        MethodDescriptor::supported("watch", Generic, "Optimistic lock a key"),
        MethodDescriptor::supported("multi", Generic, "Begin a transaction"),
        MethodDescriptor::supported("exec", Generic, "Commit a transaction"),
        MethodDescriptor::unsupported(
            "ttl",
            Generic,
            RiskLevel::Low,
            "Remaining key TTL",
            "Store the expiry timestamp alongside the value",
        )
        .with_host_status(HostStatus::Unknown),
        MethodDescriptor::unsupported(
            "scan",
            Generic,
            RiskLevel::High,
            "Iterate the keyspace",
            "Maintain an explicit index key instead of scanning",
        ),
        MethodDescriptor::unsupported(
            "keys",
            Generic,
            RiskLevel::Critical,
            "Pattern match over the whole keyspace",
            "Redesign: maintain an explicit index key",
        ),
        MethodDescriptor::unsupported(
            "flushall",
            Generic,
            RiskLevel::Critical,
            "Erase every key",
            "Redesign: delete the application's own keys explicitly",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let methods = default_methods();
        let names: HashSet<_> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names.len(), methods.len());
    }

    #[test]
    fn supported_flag_agrees_with_host_status() {
        for m in default_methods() {
            match m.host_status {
                HostStatus::Supported => assert!(m.supported, "{}", m.name),
                HostStatus::Unsupported => assert!(!m.supported, "{}", m.name),
                HostStatus::Unknown | HostStatus::Deprecated => {}
            }
        }
    }

    #[test]
    fn substitutions_target_supported_methods() {
        let methods = default_methods();
        let supported: HashSet<_> = methods
            .iter()
            .filter(|m| m.supported)
            .map(|m| m.name.clone())
            .collect();
        for m in &methods {
            if let Some(sub) = &m.substitution {
                assert!(
                    supported.contains(&sub.target_method),
                    "{} substitutes via unsupported {}",
                    m.name,
                    sub.target_method
                );
            }
        }
    }
}
