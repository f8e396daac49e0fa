use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing the engine itself rather than the operations it
/// watches.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    samples_recorded: AtomicU64,
    samples_evicted: AtomicU64,
    alerts_fired: AtomicU64,
    rules_rejected: AtomicU64,
    events_dropped: AtomicU64,
    sweeps: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMetricsSnapshot {
    pub samples_recorded: u64,
    pub samples_evicted: u64,
    pub alerts_fired: u64,
    pub rules_rejected: u64,
    pub events_dropped: u64,
    pub sweeps: u64,
}

impl EngineMetrics {
    pub fn inc_samples_recorded(&self) {
        self.samples_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_samples_evicted(&self, count: u64) {
        self.samples_evicted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_alerts_fired(&self, count: u64) {
        self.alerts_fired.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_rules_rejected(&self) {
        self.rules_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_events_dropped(&self, count: u64) {
        self.events_dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_sweeps(&self) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineMetricsSnapshot {
        EngineMetricsSnapshot {
            samples_recorded: self.samples_recorded.load(Ordering::Relaxed),
            samples_evicted: self.samples_evicted.load(Ordering::Relaxed),
            alerts_fired: self.alerts_fired.load(Ordering::Relaxed),
            rules_rejected: self.rules_rejected.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
        }
    }
}
