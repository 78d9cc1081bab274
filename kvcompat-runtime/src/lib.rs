//! # kvcompat-runtime
//!
//! [`CompatRuntime`] owns every component of the compatibility layer and the
//! running alert monitor. Build one per store; there is no process-wide
//! instance.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use kvcompat_alerts::{AlertManager, AlertMonitor, MonitorHandle};
use kvcompat_core::config::CompatConfig;
use kvcompat_core::errors::CompatResult;
use kvcompat_core::traits::IStoreClient;
use kvcompat_observability::MetricsCollector;
use kvcompat_registry::{MethodRegistry, ValidationEngine};
use kvcompat_resilience::{RankingEngine, ResilienceExecutor, ScoreWriter};

/// The composed layer.
///
/// The executor reports into `metrics`; the monitor polls the same
/// collector, so what the read and write paths observe is what the alerts
/// evaluate.
pub struct CompatRuntime {
    pub registry: Arc<MethodRegistry>,
    pub validator: Arc<ValidationEngine>,
    pub executor: Arc<ResilienceExecutor>,
    pub ranking: RankingEngine,
    pub writer: ScoreWriter,
    pub alerts: Arc<AlertManager>,
    pub metrics: Arc<MetricsCollector>,
    pub config: CompatConfig,
    monitor: Arc<AlertMonitor>,
    handle: Mutex<Option<MonitorHandle>>,
}

impl CompatRuntime {
    /// Validate `config`, wire every component over `store` and start the
    /// monitor. Must be called inside a tokio runtime.
    pub fn start(
        config: CompatConfig,
        store: Arc<dyn IStoreClient>,
        metrics: Arc<MetricsCollector>,
    ) -> CompatResult<Self> {
        config.validate()?;

        let registry = Arc::new(MethodRegistry::from_config(&config));
        let validator = Arc::new(ValidationEngine::new(registry.clone()));
        let executor = Arc::new(ResilienceExecutor::new(
            validator.clone(),
            metrics.clone(),
            config.executor.clone(),
        ));
        let ranking = RankingEngine::new(store.clone(), executor.clone(), config.ranking.clone());
        let writer = ScoreWriter::new(store, executor.clone());

        let alerts = Arc::new(AlertManager::new(config.monitor.clone()));
        let monitor = Arc::new(AlertMonitor::new(
            alerts.clone(),
            metrics.clone(),
            registry.clone(),
            config.thresholds.clone(),
            config.monitor.clone(),
        ));
        let handle = monitor.start()?;

        let report = registry.report();
        info!(
            methods = report.total,
            unsupported = report.unsupported,
            blocked = ?report.blocked,
            interval_secs = config.monitor_interval().as_secs(),
            "compatibility runtime started"
        );

        Ok(Self {
            registry,
            validator,
            executor,
            ranking,
            writer,
            alerts,
            metrics,
            config,
            monitor,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// [`CompatRuntime::start`] with default configuration and a fresh
    /// metrics collector.
    pub fn with_defaults(store: Arc<dyn IStoreClient>) -> CompatResult<Self> {
        Self::start(
            CompatConfig::default(),
            store,
            Arc::new(MetricsCollector::new()),
        )
    }

    pub fn monitor(&self) -> &Arc<AlertMonitor> {
        &self.monitor
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_running()
    }

    /// Stop the monitor timer. Idempotent; a tick in flight completes first.
    pub async fn shutdown(&self) {
        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            handle.shutdown().await;
            info!("compatibility runtime stopped");
        }
    }
}
