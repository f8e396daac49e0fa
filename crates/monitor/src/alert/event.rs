use serde::{Deserialize, Serialize};

use super::rule::{AlertRule, EQ_TOLERANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub rule_id: String,
    pub operation: String,
    pub triggered_at_ms: i64,
    pub observed_value: f64,
    pub threshold: f64,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Grades the relative deviation `|value - threshold| / |threshold|`.
    /// A zero threshold has no relative scale: any difference beyond the
    /// equality tolerance is critical, otherwise low.
    pub fn from_deviation(value: f64, threshold: f64) -> Self {
        let diff = (value - threshold).abs();
        if threshold == 0.0 {
            return if diff < EQ_TOLERANCE { Self::Low } else { Self::Critical };
        }
        let deviation = diff / threshold.abs();
        if deviation > 1.0 {
            Self::Critical
        } else if deviation > 0.5 {
            Self::High
        } else if deviation > 0.2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Alert {
    pub fn fire(rule: &AlertRule, operation: &str, value: f64, now_ms: i64) -> Self {
        Self {
            id: format!("{}-{}-{}", rule.id, operation, now_ms),
            rule_id: rule.id.clone(),
            operation: operation.to_string(),
            triggered_at_ms: now_ms,
            observed_value: value,
            threshold: rule.threshold,
            severity: Severity::from_deviation(value, rule.threshold),
            message: format!(
                "{operation}: {} {} {} (observed {value:.3})",
                rule.metric.as_str(),
                rule.comparison.symbol(),
                rule.threshold,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{Comparison, Metric};

    #[test]
    fn severity_bands() {
        assert_eq!(Severity::from_deviation(110.0, 100.0), Severity::Low);
        assert_eq!(Severity::from_deviation(130.0, 100.0), Severity::Medium);
        assert_eq!(Severity::from_deviation(160.0, 100.0), Severity::High);
        assert_eq!(Severity::from_deviation(250.0, 100.0), Severity::Critical);
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert_eq!(Severity::from_deviation(120.0, 100.0), Severity::Low);
        assert_eq!(Severity::from_deviation(200.0, 100.0), Severity::High);
    }

    #[test]
    fn below_threshold_deviation_counts_too() {
        assert_eq!(Severity::from_deviation(0.4, 0.9), Severity::High);
    }

    #[test]
    fn zero_threshold_is_finite() {
        assert_eq!(Severity::from_deviation(0.5, 0.0), Severity::Critical);
        assert_eq!(Severity::from_deviation(0.0, 0.0), Severity::Low);
        assert_eq!(Severity::from_deviation(-0.5, 0.0), Severity::Critical);
    }

    #[test]
    fn negative_threshold_uses_magnitude() {
        assert_eq!(Severity::from_deviation(-110.0, -100.0), Severity::Low);
    }

    #[test]
    fn fire_builds_id_and_message() {
        let rule = AlertRule {
            id: "slow".into(),
            operation: "*".into(),
            metric: Metric::Duration,
            threshold: 100.0,
            comparison: Comparison::Gt,
            time_window_ms: 0,
            cooldown_ms: 0,
            enabled: true,
        };
        let alert = Alert::fire(&rule, "db.query", 150.0, 42);
        assert_eq!(alert.id, "slow-db.query-42");
        assert_eq!(alert.severity, Severity::Medium);
        assert!(alert.message.contains("db.query"));
        assert!(alert.message.contains("duration > 100"));
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }
}
