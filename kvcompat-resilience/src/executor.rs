//! Resilience executor: one primary attempt, compatibility-only fallback.
//!
//! Every attempt is bounded by the configured timeout, timed, and reported to
//! the telemetry sink. A failed primary falls back only when its error is
//! tagged compatibility-class; every other failure propagates unchanged.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, Instrument};

use kvcompat_core::config::ExecutorConfig;
use kvcompat_core::errors::{CompatError, CompatResult, StoreError, StoreErrorKind};
use kvcompat_core::models::{CompatibilityIssue, OperationRecord, Verdict};
use kvcompat_core::traits::ITelemetrySink;
use kvcompat_observability::storage_span;
use kvcompat_observability::tracing_setup::events;
use kvcompat_registry::ValidationEngine;

pub struct ResilienceExecutor {
    validator: Arc<ValidationEngine>,
    telemetry: Arc<dyn ITelemetrySink>,
    config: ExecutorConfig,
}

impl ResilienceExecutor {
    pub fn new(
        validator: Arc<ValidationEngine>,
        telemetry: Arc<dyn ITelemetrySink>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            validator,
            telemetry,
            config,
        }
    }

    pub fn validator(&self) -> &ValidationEngine {
        &self.validator
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `primary`; on a compatibility-class failure record the issue and
    /// run `fallback` instead, returning its result.
    ///
    /// `method` names the command `primary` issues and `fallback_method` the
    /// one `fallback` issues; each attempt's telemetry is recorded under its
    /// own command.
    ///
    /// Calls rejected by pre-flight validation fail with
    /// [`CompatError::Rejected`] before any attempt is made.
    pub async fn execute_with_fallback<T, P, PFut, F, FFut>(
        &self,
        operation: &str,
        method: &str,
        fallback_method: &str,
        params: &[String],
        primary: P,
        fallback: F,
    ) -> CompatResult<T>
    where
        P: FnOnce() -> PFut,
        PFut: Future<Output = CompatResult<T>>,
        F: FnOnce() -> FFut,
        FFut: Future<Output = CompatResult<T>>,
    {
        self.preflight(operation, method, params)?;

        let err = match self.attempt(operation, method, false, primary()).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !err.is_compatibility() {
            debug!(operation, method, error = %err, "failure is not compatibility-class");
            return Err(err);
        }

        let issue = self.compatibility_issue(method, &err);
        events::compatibility_issue(operation, &issue);
        self.telemetry.record_compatibility_issue(&issue);

        events::fallback_engaged(operation, fallback_method);
        self.attempt(operation, fallback_method, true, fallback())
            .await
    }

    /// Run a single attempt with validation, timeout and telemetry but no
    /// fallback leg.
    pub async fn execute<T, P, PFut>(
        &self,
        operation: &str,
        method: &str,
        params: &[String],
        primary: P,
    ) -> CompatResult<T>
    where
        P: FnOnce() -> PFut,
        PFut: Future<Output = CompatResult<T>>,
    {
        self.preflight(operation, method, params)?;
        self.attempt(operation, method, false, primary()).await
    }

    fn preflight(&self, operation: &str, method: &str, params: &[String]) -> CompatResult<()> {
        if !self.config.validate_before_execute {
            return Ok(());
        }
        let check = self.validator.validate(method, params);
        match check.verdict {
            Verdict::Reject { reason, .. } => {
                events::validation_rejected(operation, method, &reason);
                Err(CompatError::Rejected {
                    method: method.to_string(),
                    reason,
                })
            }
            Verdict::Proceed {
                warning: Some(hit),
            } => {
                debug!(operation, method, rule = %hit.rule_id, "{}", hit.message);
                Ok(())
            }
            Verdict::Proceed { warning: None } | Verdict::ProceedWithFallback { .. } => Ok(()),
        }
    }

    async fn attempt<T, Fut>(
        &self,
        operation: &str,
        method: &str,
        fallback: bool,
        fut: Fut,
    ) -> CompatResult<T>
    where
        Fut: Future<Output = CompatResult<T>>,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let result = match tokio::time::timeout(self.config.operation_timeout(), fut)
            .instrument(storage_span!(operation, method))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(StoreError::timeout(method, self.config.operation_timeout_ms).into()),
        };

        self.telemetry.record_operation(&OperationRecord {
            operation: operation.to_string(),
            method: method.to_string(),
            started_at,
            duration: start.elapsed(),
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
            fallback,
        });
        result
    }

    fn compatibility_issue(&self, method: &str, err: &CompatError) -> CompatibilityIssue {
        let registry = self.validator.registry();
        CompatibilityIssue {
            method: method.to_string(),
            error_message: err.to_string(),
            timestamp: Utc::now(),
            supported: registry.is_supported(method),
            unsupported: registry.is_unsupported(method),
            category: err
                .store_kind()
                .unwrap_or(StoreErrorKind::Other)
                .issue_category(),
            recommendation: registry.recommendation_for(method),
        }
    }
}
