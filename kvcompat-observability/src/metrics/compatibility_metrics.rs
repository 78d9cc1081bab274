//! Compatibility-issue accounting per method.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use kvcompat_core::models::{CompatibilityIssue, IssueCategory};

/// Keep the last N issue records for inspection.
const MAX_RECENT_ISSUES: usize = 200;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompatibilityMetrics {
    /// Lifetime issue count per method.
    pub issues_by_method: BTreeMap<String, u64>,
    /// Lifetime issue count per category.
    pub issues_by_category: BTreeMap<String, u64>,
    #[serde(skip)]
    recent: VecDeque<CompatibilityIssue>,
}

impl CompatibilityMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, issue: &CompatibilityIssue) {
        *self
            .issues_by_method
            .entry(issue.method.to_ascii_lowercase())
            .or_insert(0) += 1;
        *self
            .issues_by_category
            .entry(issue.category.as_str().to_string())
            .or_insert(0) += 1;
        self.recent.push_back(issue.clone());
        if self.recent.len() > MAX_RECENT_ISSUES {
            self.recent.pop_front();
        }
    }

    pub fn total(&self) -> u64 {
        self.issues_by_method.values().sum()
    }

    pub fn count_for(&self, category: IssueCategory) -> u64 {
        self.issues_by_category
            .get(category.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Most recent issues, newest first.
    pub fn recent(&self, limit: usize) -> Vec<CompatibilityIssue> {
        self.recent.iter().rev().take(limit).cloned().collect()
    }
}
