use crate::models::{CompatibilityIssue, OperationRecord};

/// Receives timing and compatibility records from the executor.
pub trait ITelemetrySink: Send + Sync {
    fn record_operation(&self, record: &OperationRecord);
    fn record_compatibility_issue(&self, issue: &CompatibilityIssue);
}
