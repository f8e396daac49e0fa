use serde::{Deserialize, Serialize};

use super::percentile::percentile;
use crate::sample::Sample;

/// Statistics derived from a slice of samples. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    pub count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub average_duration_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub p50_duration_ms: f64,
    pub p95_duration_ms: f64,
    pub p99_duration_ms: f64,
    pub success_rate: f64,
    pub error_rate: f64,
    pub throughput_per_sec: f64,
    pub last_executed_at_ms: i64,
}

/// Returns `None` for an empty slice; "no stats" is not an error.
pub fn aggregate(samples: &[Sample]) -> Option<OperationStats> {
    if samples.is_empty() {
        return None;
    }

    let count = samples.len();
    let success_count = samples.iter().filter(|s| s.success).count();
    let failure_count = count - success_count;

    let mut durations: Vec<f64> = samples.iter().map(|s| s.duration_ms).collect();
    durations.sort_by(|a, b| a.total_cmp(b));
    let sum: f64 = durations.iter().sum();

    let min = durations[0];
    let max = durations[count - 1];
    let pct = |p| percentile(&durations, p).unwrap_or(max).clamp(min, max);

    let first_ts = samples.iter().map(|s| s.timestamp_ms).min().unwrap_or(0);
    let last_ts = samples.iter().map(|s| s.timestamp_ms).max().unwrap_or(0);
    let span_ms = (last_ts - first_ts).max(1);

    let success_rate = success_count as f64 / count as f64;

    Some(OperationStats {
        count,
        success_count,
        failure_count,
        average_duration_ms: sum / count as f64,
        min_duration_ms: min,
        max_duration_ms: max,
        p50_duration_ms: pct(50.0),
        p95_duration_ms: pct(95.0),
        p99_duration_ms: pct(99.0),
        success_rate,
        error_rate: 1.0 - success_rate,
        throughput_per_sec: count as f64 / span_ms as f64 * 1000.0,
        last_executed_at_ms: last_ts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(durations: &[f64], ts_step: i64) -> Vec<Sample> {
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| Sample::new("op", *d, true, 1000 + i as i64 * ts_step))
            .collect()
    }

    #[test]
    fn empty_has_no_stats() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn reference_percentiles() {
        let d: Vec<f64> = (1..=10).map(|i| (i * 10) as f64).collect();
        let stats = aggregate(&samples(&d, 10)).unwrap();
        assert_eq!(stats.p50_duration_ms, 50.0);
        assert_eq!(stats.p95_duration_ms, 100.0);
        assert_eq!(stats.p99_duration_ms, 100.0);
        assert_eq!(stats.min_duration_ms, 10.0);
        assert_eq!(stats.max_duration_ms, 100.0);
        assert_eq!(stats.average_duration_ms, 55.0);
    }

    #[test]
    fn percentiles_are_ordered_for_unsorted_input() {
        let stats = aggregate(&samples(&[90.0, 3.0, 41.0, 7.5, 1000.0, 12.0, 3.0], 1)).unwrap();
        assert!(stats.min_duration_ms <= stats.p50_duration_ms);
        assert!(stats.p50_duration_ms <= stats.p95_duration_ms);
        assert!(stats.p95_duration_ms <= stats.p99_duration_ms);
        assert!(stats.p99_duration_ms <= stats.max_duration_ms);
    }

    #[test]
    fn counts_and_rates() {
        let mut s = samples(&[1.0, 2.0, 3.0, 4.0], 1);
        s[1].success = false;
        let stats = aggregate(&s).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.success_count + stats.failure_count, stats.count);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.success_rate, 0.75);
        assert_eq!(stats.error_rate, 0.25);
    }

    #[test]
    fn throughput_uses_sample_span() {
        // 5 samples spread over 2000 ms
        let stats = aggregate(&samples(&[1.0; 5], 500)).unwrap();
        assert!((stats.throughput_per_sec - 2.5).abs() < 1e-9);
        assert_eq!(stats.last_executed_at_ms, 3000);
    }

    #[test]
    fn throughput_floor_for_identical_timestamps() {
        let stats = aggregate(&samples(&[1.0; 3], 0)).unwrap();
        assert_eq!(stats.throughput_per_sec, 3000.0);
    }
}
