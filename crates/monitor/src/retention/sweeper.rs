use std::sync::Arc;

use crate::alert::AlertStore;
use crate::clock::Clock;
use crate::metrics::EngineMetrics;
use crate::sample::SampleStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub samples_dropped: usize,
    pub alerts_dropped: usize,
}

/// Evicts samples and alerts older than the retention horizon.
#[derive(Clone)]
pub struct RetentionManager {
    samples: SampleStore,
    alerts: AlertStore,
    clock: Arc<dyn Clock>,
    metrics: Arc<EngineMetrics>,
    retention_ms: i64,
}

impl RetentionManager {
    pub fn new(
        samples: SampleStore,
        alerts: AlertStore,
        clock: Arc<dyn Clock>,
        metrics: Arc<EngineMetrics>,
        retention_ms: i64,
    ) -> Self {
        Self {
            samples,
            alerts,
            clock,
            metrics,
            retention_ms,
        }
    }

    pub fn sweep(&self) -> SweepReport {
        let cutoff = self.clock.now_ms() - self.retention_ms;
        let report = SweepReport {
            samples_dropped: self.samples.prune_before(cutoff),
            alerts_dropped: self.alerts.prune_before(cutoff),
        };
        self.metrics.inc_sweeps();
        self.metrics.add_samples_evicted(report.samples_dropped as u64);

        if report.samples_dropped > 0 || report.alerts_dropped > 0 {
            tracing::info!(
                samples = report.samples_dropped,
                alerts = report.alerts_dropped,
                cutoff_ms = cutoff,
                "retention sweep evicted stale data"
            );
        }
        report
    }
}
