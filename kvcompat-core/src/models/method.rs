//! Method descriptors: the static classification of every store command.

use serde::{Deserialize, Serialize};

/// Data-structure family a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodCategory {
    String,
    Hash,
    SortedSet,
    List,
    Set,
    Stream,
    Generic,
}

/// Risk of relying on a command the host may not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// What the host environment reports for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Supported,
    Unsupported,
    Unknown,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionStrategy {
    DirectReplacement,
    AlgorithmBased,
    MultiStep,
    CachedFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceImpact {
    None,
    Minimal,
    Moderate,
    Significant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyLevel {
    Exact,
    Approximate,
    BestEffort,
}

/// How an unsupported command is replaced by supported ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionDescriptor {
    /// Supported command the replacement is built from.
    pub target_method: String,
    pub strategy: SubstitutionStrategy,
    pub performance_impact: PerformanceImpact,
    pub accuracy: AccuracyLevel,
    /// Illustrative usage.
    #[serde(default)]
    pub example: String,
}

/// Classification of a single store command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub supported: bool,
    pub category: MethodCategory,
    pub risk_level: RiskLevel,
    pub host_status: HostStatus,
    #[serde(default)]
    pub description: String,
    /// Free-text advice on what to call instead.
    #[serde(default)]
    pub alternative: String,
    #[serde(default)]
    pub substitution: Option<SubstitutionDescriptor>,
}

impl MethodDescriptor {
    /// A supported command with low risk.
    pub fn supported(name: &str, category: MethodCategory, description: &str) -> Self {
        Self {
            name: name.to_string(),
            supported: true,
            category,
            risk_level: RiskLevel::Low,
            host_status: HostStatus::Supported,
            description: description.to_string(),
            alternative: String::new(),
            substitution: None,
        }
    }

    /// An unsupported command at the given risk level.
    pub fn unsupported(
        name: &str,
        category: MethodCategory,
        risk_level: RiskLevel,
        description: &str,
        alternative: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            supported: false,
            category,
            risk_level,
            host_status: HostStatus::Unsupported,
            description: description.to_string(),
            alternative: alternative.to_string(),
            substitution: None,
        }
    }

    pub fn with_substitution(mut self, substitution: SubstitutionDescriptor) -> Self {
        self.substitution = Some(substitution);
        self
    }

    pub fn with_host_status(mut self, status: HostStatus) -> Self {
        self.host_status = status;
        self
    }

    /// Unsupported, critical, and nothing to fall back to.
    pub fn is_blocked(&self) -> bool {
        !self.supported && self.risk_level == RiskLevel::Critical && self.substitution.is_none()
    }
}
