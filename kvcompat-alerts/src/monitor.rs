//! Periodic health monitor.
//!
//! One tick: sweep expired resolved alerts, pull a metrics snapshot, run the
//! evaluators, trigger what breached. `start` spawns the ticker on the tokio
//! runtime; the returned [`MonitorHandle`] stops it. Stopping never cancels a
//! tick that is already running.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn, Instrument};

use kvcompat_core::config::{MonitorConfig, ThresholdConfig};
use kvcompat_core::errors::{AlertError, CompatError, CompatResult};
use kvcompat_core::traits::IMetricsSource;
use kvcompat_observability::monitor_tick_span;
use kvcompat_registry::MethodRegistry;

use crate::evaluators::evaluate_all;
use crate::manager::AlertManager;

/// Summary of one evaluation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub created: usize,
    pub refreshed: usize,
    pub swept: usize,
}

pub struct AlertMonitor {
    manager: Arc<AlertManager>,
    metrics: Arc<dyn IMetricsSource>,
    registry: Arc<MethodRegistry>,
    thresholds: ThresholdConfig,
    config: MonitorConfig,
    ticks: AtomicU64,
    running: Arc<AtomicBool>,
}

impl AlertMonitor {
    pub fn new(
        manager: Arc<AlertManager>,
        metrics: Arc<dyn IMetricsSource>,
        registry: Arc<MethodRegistry>,
        thresholds: ThresholdConfig,
        config: MonitorConfig,
    ) -> Self {
        Self {
            manager,
            metrics,
            registry,
            thresholds,
            config,
            ticks: AtomicU64::new(0),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn manager(&self) -> &Arc<AlertManager> {
        &self.manager
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Evaluate once, now.
    pub async fn run_tick(&self) -> CompatResult<TickReport> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        async {
            let swept = self.manager.sweep_resolved(Utc::now())?;

            let health = self.metrics.health_summary();
            let stats = self.metrics.performance_stats();
            let candidates = evaluate_all(&health, &stats, &self.thresholds, &self.registry);

            let mut report = TickReport {
                tick,
                swept,
                ..TickReport::default()
            };
            for candidate in candidates {
                if self.manager.trigger_alert(candidate).await?.is_created() {
                    report.created += 1;
                } else {
                    report.refreshed += 1;
                }
            }
            debug!(
                tick,
                error_rate = health.error_rate,
                avg_ms = health.average_response_time_ms,
                created = report.created,
                refreshed = report.refreshed,
                swept,
                "monitor tick complete"
            );
            Ok::<_, CompatError>(report)
        }
        .instrument(monitor_tick_span!(tick))
        .await
    }

    /// Spawn the ticker. Fails if this monitor is already running.
    ///
    /// The first evaluation happens one interval after start.
    pub fn start(self: &Arc<Self>) -> CompatResult<MonitorHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AlertError::MonitorAlreadyRunning.into());
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let monitor = Arc::clone(self);
        let period = std::time::Duration::from_secs(self.config.interval_secs);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = period.as_secs(), "alert monitor started");

            loop {
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = monitor.run_tick().await {
                            warn!(error = %e, "monitor tick failed");
                        }
                    }
                }
            }
            info!("alert monitor stopped");
        });

        Ok(MonitorHandle {
            shutdown: shutdown_tx,
            task,
            running: Arc::clone(&self.running),
        })
    }
}

/// Owner of a running monitor task.
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    running: Arc<AtomicBool>,
}

impl MonitorHandle {
    /// Stop future ticks and wait for the task to exit. A tick in flight
    /// finishes first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "alert monitor task ended abnormally");
        }
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
