pub mod alert;
pub mod method;
pub mod scored;
pub mod telemetry;
pub mod validation;

pub use alert::{
    AlertCandidate, AlertFilter, AlertHistoryEntry, AlertItem, AlertStats, AlertStatus, AlertType,
};
pub use method::{
    AccuracyLevel, HostStatus, MethodCategory, MethodDescriptor, PerformanceImpact, RiskLevel,
    SubstitutionDescriptor, SubstitutionStrategy,
};
pub use scored::{RankOutcome, RankedEntry, ScoreOrder, ScoredMember};
pub use telemetry::{
    CompatibilityIssue, HealthSummary, IssueCategory, OperationRecord, PerformanceStats,
};
pub use validation::{CompatibilityCheckResult, RuleCategory, RuleHit, Severity, Verdict};
