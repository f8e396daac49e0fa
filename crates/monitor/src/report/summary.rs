use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregator::OperationStats;
use crate::alert::Alert;

pub const SLOWEST_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_operations: usize,
    pub total_requests: usize,
    pub average_response_time: f64,
    pub error_rate: f64,
    pub slowest_operations: Vec<SlowOperation>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlowOperation {
    pub operation: String,
    pub average_duration_ms: f64,
    pub count: usize,
}

/// Request-weighted rollup of per-operation stats.
pub fn build_summary(stats: &BTreeMap<String, OperationStats>, alerts: Vec<Alert>) -> Summary {
    let total_requests: usize = stats.values().map(|s| s.count).sum();
    let failures: usize = stats.values().map(|s| s.failure_count).sum();
    let weighted: f64 = stats
        .values()
        .map(|s| s.average_duration_ms * s.count as f64)
        .sum();

    let (average_response_time, error_rate) = if total_requests == 0 {
        (0.0, 0.0)
    } else {
        (
            weighted / total_requests as f64,
            failures as f64 / total_requests as f64,
        )
    };

    let mut slowest: Vec<SlowOperation> = stats
        .iter()
        .map(|(op, s)| SlowOperation {
            operation: op.clone(),
            average_duration_ms: s.average_duration_ms,
            count: s.count,
        })
        .collect();
    slowest.sort_by(|a, b| b.average_duration_ms.total_cmp(&a.average_duration_ms));
    slowest.truncate(SLOWEST_LIMIT);

    Summary {
        total_operations: stats.len(),
        total_requests,
        average_response_time,
        error_rate,
        slowest_operations: slowest,
        alerts,
    }
}
