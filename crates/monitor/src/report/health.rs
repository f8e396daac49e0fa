use serde::{Deserialize, Serialize};

use super::summary::Summary;
use crate::alert::Severity;
use crate::config::HealthPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub healthy: bool,
    pub issues: Vec<String>,
    pub critical_alert_count: usize,
    pub average_response_time: f64,
    pub error_rate: f64,
}

pub fn evaluate_health(summary: &Summary, policy: &HealthPolicy) -> HealthStatus {
    let critical_alert_count = summary
        .alerts
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count();

    let mut issues = Vec::new();
    if summary.average_response_time > policy.max_average_response_ms {
        issues.push(format!(
            "average response time {:.1}ms exceeds {}ms",
            summary.average_response_time, policy.max_average_response_ms
        ));
    }
    if summary.error_rate > policy.max_error_rate {
        issues.push(format!(
            "error rate {:.2}% exceeds {:.2}%",
            summary.error_rate * 100.0,
            policy.max_error_rate * 100.0
        ));
    }
    if critical_alert_count > 0 {
        issues.push(format!("{critical_alert_count} critical alert(s) in window"));
    }

    HealthStatus {
        healthy: issues.is_empty(),
        issues,
        critical_alert_count,
        average_response_time: summary.average_response_time,
        error_rate: summary.error_rate,
    }
}
