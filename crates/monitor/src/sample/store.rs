use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use super::record::Sample;

pub const MAX_SAMPLES_PER_OPERATION: usize = 1000;

/// Per-operation bounded buffers, each kept in ascending timestamp order.
#[derive(Clone)]
pub struct SampleStore {
    series: Arc<DashMap<String, VecDeque<Sample>>>,
    max_per_operation: usize,
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new(MAX_SAMPLES_PER_OPERATION)
    }
}

impl SampleStore {
    pub fn new(max_per_operation: usize) -> Self {
        Self {
            series: Arc::new(DashMap::new()),
            max_per_operation: max_per_operation.max(1),
        }
    }

    /// Appends the sample and returns how many of the oldest samples were
    /// dropped to stay within the cap.
    pub fn record(&self, sample: Sample) -> usize {
        let mut buf = self.series.entry(sample.operation.clone()).or_default();
        let out_of_order = buf
            .back()
            .is_some_and(|last| last.timestamp_ms > sample.timestamp_ms);
        if out_of_order {
            let at = buf.partition_point(|s| s.timestamp_ms <= sample.timestamp_ms);
            buf.insert(at, sample);
        } else {
            buf.push_back(sample);
        }

        let mut evicted = 0;
        while buf.len() > self.max_per_operation {
            buf.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Samples newer than `now_ms - window_ms`, oldest first. A missing or
    /// non-positive window returns everything retained.
    pub fn query(&self, operation: &str, window_ms: Option<i64>, now_ms: i64) -> Vec<Sample> {
        let Some(buf) = self.series.get(operation) else {
            return Vec::new();
        };
        match window_ms.filter(|w| *w > 0) {
            Some(window) => {
                let cutoff = now_ms - window;
                let start = buf.partition_point(|s| s.timestamp_ms <= cutoff);
                buf.range(start..).cloned().collect()
            }
            None => buf.iter().cloned().collect(),
        }
    }

    pub fn operations(&self) -> Vec<String> {
        let mut ops: Vec<String> = self.series.iter().map(|e| e.key().clone()).collect();
        ops.sort();
        ops
    }

    pub fn len(&self, operation: &str) -> usize {
        self.series.get(operation).map(|b| b.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Drops samples older than `cutoff_ms`; operations left without samples
    /// are removed entirely. Returns the number of samples dropped.
    pub fn prune_before(&self, cutoff_ms: i64) -> usize {
        let mut dropped = 0;
        self.series.retain(|_, buf| {
            while buf.front().is_some_and(|s| s.timestamp_ms < cutoff_ms) {
                buf.pop_front();
                dropped += 1;
            }
            !buf.is_empty()
        });
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(op: &str, ts: i64, duration: f64) -> Sample {
        Sample::new(op, duration, true, ts)
    }

    #[test]
    fn record_and_query_all() {
        let store = SampleStore::default();
        store.record(sample("db", 100, 1.0));
        store.record(sample("db", 200, 2.0));
        let all = store.query("db", None, 300);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].timestamp_ms, 100);
    }

    #[test]
    fn fifo_eviction_at_cap() {
        let store = SampleStore::default();
        for i in 0..1001 {
            store.record(sample("op", i, i as f64));
        }
        assert_eq!(store.len("op"), MAX_SAMPLES_PER_OPERATION);
        let all = store.query("op", None, 2000);
        assert_eq!(all[0].timestamp_ms, 1);
        assert_eq!(all[999].timestamp_ms, 1000);
    }

    #[test]
    fn record_reports_evictions() {
        let store = SampleStore::new(2);
        assert_eq!(store.record(sample("op", 1, 1.0)), 0);
        assert_eq!(store.record(sample("op", 2, 1.0)), 0);
        assert_eq!(store.record(sample("op", 3, 1.0)), 1);
    }

    #[test]
    fn window_is_exclusive_of_cutoff() {
        let store = SampleStore::default();
        store.record(sample("op", 1000, 1.0));
        store.record(sample("op", 1500, 2.0));
        store.record(sample("op", 2000, 3.0));
        let recent = store.query("op", Some(1000), 2500);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].timestamp_ms, 1500);
    }

    #[test]
    fn zero_window_means_everything() {
        let store = SampleStore::default();
        store.record(sample("op", 1, 1.0));
        assert_eq!(store.query("op", Some(0), 1_000_000).len(), 1);
    }

    #[test]
    fn out_of_order_sample_is_inserted_in_place() {
        let store = SampleStore::default();
        store.record(sample("op", 300, 3.0));
        store.record(sample("op", 100, 1.0));
        store.record(sample("op", 200, 2.0));
        let ts: Vec<i64> = store.query("op", None, 400).iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(ts, vec![100, 200, 300]);
    }

    #[test]
    fn query_returns_a_copy() {
        let store = SampleStore::default();
        store.record(sample("op", 1, 1.0));
        let snapshot = store.query("op", None, 10);
        store.record(sample("op", 2, 1.0));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len("op"), 2);
    }

    #[test]
    fn prune_removes_empty_operations() {
        let store = SampleStore::default();
        store.record(sample("old", 100, 1.0));
        store.record(sample("mixed", 100, 1.0));
        store.record(sample("mixed", 900, 1.0));
        let dropped = store.prune_before(500);
        assert_eq!(dropped, 2);
        assert_eq!(store.operations(), vec!["mixed".to_string()]);
    }

    #[test]
    fn missing_operation_is_empty() {
        let store = SampleStore::default();
        assert!(store.query("nope", None, 0).is_empty());
        assert!(store.is_empty());
    }
}
