use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::{aggregate, OperationStats};
use crate::alert::{default_rules, Alert, AlertEngine, AlertRule, AlertStore, RuleError};
use crate::clock::{Clock, SystemClock};
use crate::config::{self, LoadError, MonitorConfig};
use crate::metrics::{EngineMetrics, EngineMetricsSnapshot};
use crate::observer::{AlertObserver, MetricObserver, Observers, SubscriptionId};
use crate::probe::{NoopProbe, ResourceProbe, SysinfoProbe};
use crate::report::{
    build_summary, evaluate_health, render_prometheus, ExportError, ExportFormat, HealthStatus,
    JsonExport, Summary,
};
use crate::retention::{spawn_sweeper, RetentionManager, SweepHandle, SweepReport};
use crate::sample::{Sample, SampleMetadata, SampleStore};
use crate::timing::{error_kind, Timing};

/// The engine. Cheap to clone; every clone shares the same state, so the
/// host constructs one at startup and hands clones to its handlers.
#[derive(Clone)]
pub struct PerformanceMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    config: MonitorConfig,
    samples: SampleStore,
    alerts: AlertStore,
    engine: AlertEngine,
    observers: Observers,
    probe: Arc<dyn ResourceProbe>,
    clock: Arc<dyn Clock>,
    metrics: Arc<EngineMetrics>,
    retention: RetentionManager,
    sweeper: Mutex<Option<SweepHandle>>,
}

pub struct MonitorBuilder {
    config: MonitorConfig,
    clock: Option<Arc<dyn Clock>>,
    probe: Option<Arc<dyn ResourceProbe>>,
}

impl MonitorBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn ResourceProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn build(self) -> Result<PerformanceMonitor, LoadError> {
        config::validate_config(&self.config)?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let probe = self.probe.unwrap_or_else(|| {
            if self.config.resource_probe {
                Arc::new(SysinfoProbe::new())
            } else {
                Arc::new(NoopProbe)
            }
        });

        let mut rules = Vec::new();
        if self.config.install_default_rules {
            rules.extend(default_rules());
        }
        rules.extend(self.config.rules.iter().cloned());
        let engine = AlertEngine::with_rules(rules)?;

        let samples = SampleStore::new(self.config.max_samples_per_operation);
        let alerts = AlertStore::new(self.config.max_alerts_per_operation);
        let metrics = Arc::new(EngineMetrics::default());
        let retention = RetentionManager::new(
            samples.clone(),
            alerts.clone(),
            clock.clone(),
            metrics.clone(),
            self.config.retention_ms,
        );

        Ok(PerformanceMonitor {
            inner: Arc::new(Inner {
                config: self.config,
                samples,
                alerts,
                engine,
                observers: Observers::default(),
                probe,
                clock,
                metrics,
                retention,
                sweeper: Mutex::new(None),
            }),
        })
    }
}

impl PerformanceMonitor {
    pub fn builder(config: MonitorConfig) -> MonitorBuilder {
        MonitorBuilder {
            config,
            clock: None,
            probe: None,
        }
    }

    pub fn new(config: MonitorConfig) -> Result<Self, LoadError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn now_ms(&self) -> i64 {
        self.inner.clock.now_ms()
    }

    pub(crate) fn probe(&self) -> &dyn ResourceProbe {
        self.inner.probe.as_ref()
    }

    // ---- ingestion ----

    /// Times `fut` and records its outcome. The future's error is returned
    /// unchanged after a failure sample is recorded.
    pub async fn track<F, T, E>(&self, operation: &str, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.track_with(operation, SampleMetadata::default(), fut).await
    }

    pub async fn track_with<F, T, E>(
        &self,
        operation: &str,
        metadata: SampleMetadata,
        fut: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut timing = self.start_timing(operation);
        timing.merge_metadata(metadata);
        match fut.await {
            Ok(value) => {
                timing.finish(true);
                Ok(value)
            }
            Err(e) => {
                timing.fail(error_kind::<E>(), e.to_string());
                Err(e)
            }
        }
    }

    pub fn track_blocking<T, E, F>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        let timing = self.start_timing(operation);
        match f() {
            Ok(value) => {
                timing.finish(true);
                Ok(value)
            }
            Err(e) => {
                timing.fail(error_kind::<E>(), e.to_string());
                Err(e)
            }
        }
    }

    /// Starts a measurement for callers that time work themselves.
    pub fn start_timing(&self, operation: &str) -> Timing {
        Timing::start(self.clone(), operation.to_string())
    }

    /// Stores the sample, notifies metric observers, then evaluates the rules
    /// bound to its operation. Returns the alerts that fired.
    pub fn record_metric(&self, sample: Sample) -> Vec<Alert> {
        let inner = &self.inner;
        let operation = sample.operation.clone();
        tracing::debug!(%operation, duration_ms = sample.duration_ms, success = sample.success, "sample recorded");

        let evicted = inner.samples.record(sample.clone());
        let dropped = inner.observers.notify_metric(&sample);
        inner.metrics.inc_samples_recorded();
        inner.metrics.add_samples_evicted(evicted as u64);
        inner.metrics.add_events_dropped(dropped as u64);

        let fired = inner
            .engine
            .on_sample_recorded(&operation, &inner.samples, self.now_ms());
        for alert in &fired {
            tracing::warn!(
                rule_id = %alert.rule_id,
                operation = %alert.operation,
                severity = alert.severity.as_str(),
                value = alert.observed_value,
                threshold = alert.threshold,
                "{}",
                alert.message
            );
            inner.alerts.push(alert.clone());
            let dropped = inner.observers.notify_alert(alert);
            inner.metrics.add_events_dropped(dropped as u64);
        }
        inner.metrics.add_alerts_fired(fired.len() as u64);
        fired
    }

    // ---- rules and alerts ----

    pub fn add_alert_rule(&self, rule: AlertRule) -> Result<(), RuleError> {
        self.inner.engine.add_rule(rule).inspect_err(|e| {
            self.inner.metrics.inc_rules_rejected();
            tracing::warn!("alert rule rejected: {e}");
        })
    }

    pub fn remove_alert_rule(&self, id: &str) -> bool {
        self.inner.engine.remove_rule(id)
    }

    pub fn alert_rules(&self) -> Vec<AlertRule> {
        self.inner.engine.list_rules()
    }

    /// Newest first.
    pub fn alerts(&self, operation: Option<&str>) -> Vec<Alert> {
        self.inner.alerts.list(operation)
    }

    pub fn clear_alerts(&self, operation: Option<&str>) {
        self.inner.alerts.clear(operation);
    }

    pub fn rule_engine(&self) -> &AlertEngine {
        &self.inner.engine
    }

    // ---- observers ----

    pub fn subscribe_metrics(&self, observer: Arc<dyn MetricObserver>) -> SubscriptionId {
        self.inner.observers.subscribe_metrics(observer)
    }

    pub fn subscribe_alerts(&self, observer: Arc<dyn AlertObserver>) -> SubscriptionId {
        self.inner.observers.subscribe_alerts(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    // ---- reporting ----

    pub fn operations(&self) -> Vec<String> {
        self.inner.samples.operations()
    }

    /// Copy of the retained samples for `operation`, oldest first.
    pub fn samples(&self, operation: &str, window_ms: Option<i64>) -> Vec<Sample> {
        self.inner.samples.query(operation, window_ms, self.now_ms())
    }

    /// `None` or a non-positive window covers every retained sample.
    pub fn stats(&self, operation: &str, window_ms: Option<i64>) -> Option<OperationStats> {
        let samples = self.inner.samples.query(operation, window_ms, self.now_ms());
        aggregate(&samples)
    }

    pub fn all_stats(&self, window_ms: Option<i64>) -> BTreeMap<String, OperationStats> {
        self.operations()
            .into_iter()
            .filter_map(|op| self.stats(&op, window_ms).map(|s| (op, s)))
            .collect()
    }

    /// Rollup over `window_ms`, defaulting to the configured summary window.
    pub fn summary(&self, window_ms: Option<i64>) -> Summary {
        let window = window_ms.unwrap_or(self.inner.config.summary_window_ms);
        let stats = self.all_stats(Some(window));
        let alerts = if window > 0 {
            self.inner.alerts.since(self.now_ms() - window)
        } else {
            self.inner.alerts.list(None)
        };
        build_summary(&stats, alerts)
    }

    pub fn health_status(&self) -> HealthStatus {
        let policy = &self.inner.config.health;
        evaluate_health(&self.summary(Some(policy.window_ms)), policy)
    }

    pub fn export_metrics(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => JsonExport {
                timestamp: self.now_ms(),
                summary: self.summary(None),
                operations: self.all_stats(None),
                alerts: self.alerts(None),
            }
            .render(),
            ExportFormat::Prometheus => Ok(render_prometheus(
                &self.all_stats(None),
                &self.engine_metrics(),
            )),
        }
    }

    pub fn engine_metrics(&self) -> EngineMetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    // ---- retention ----

    pub fn sweep_now(&self) -> SweepReport {
        self.inner.retention.sweep()
    }

    /// Starts the periodic retention sweep on the current tokio runtime.
    /// Returns `false` if a sweeper is already running or no runtime exists.
    pub fn start_retention(&self) -> bool {
        let mut slot = self.inner.sweeper.lock();
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            return false;
        }
        let retention = self.inner.retention.clone();
        let interval = Duration::from_millis(self.inner.config.sweep_interval_ms);
        *slot = spawn_sweeper(interval, move || {
            retention.sweep();
        });
        let started = slot.is_some();
        if started {
            tracing::info!(interval_ms = self.inner.config.sweep_interval_ms, "retention sweeper started");
        }
        started
    }

    pub fn stop_retention(&self) {
        if let Some(handle) = self.inner.sweeper.lock().take() {
            handle.abort();
            tracing::info!("retention sweeper stopped");
        }
    }

    pub fn retention_running(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}
