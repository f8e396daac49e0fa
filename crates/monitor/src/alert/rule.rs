use serde::{Deserialize, Serialize};

use super::error::RuleError;
use crate::aggregator::OperationStats;

/// Operation name that binds a rule to every operation.
pub const WILDCARD: &str = "*";

/// Absolute tolerance used by [`Comparison::Eq`].
pub const EQ_TOLERANCE: f64 = 1e-3;

const DEFAULT_WINDOW_MS: i64 = 5 * 60 * 1000;
const DEFAULT_COOLDOWN_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: String,
    pub operation: String,
    pub metric: Metric,
    pub threshold: f64,
    pub comparison: Comparison,
    #[serde(default, alias = "time_window_ms")]
    pub time_window_ms: i64,
    #[serde(default, alias = "cooldown_ms")]
    pub cooldown_ms: i64,
    #[serde(default = "yes")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Duration,
    SuccessRate,
    ErrorRate,
    Throughput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Lt,
    Eq,
}

impl Metric {
    pub fn extract(&self, stats: &OperationStats) -> f64 {
        match self {
            Self::Duration => stats.average_duration_ms,
            Self::SuccessRate => stats.success_rate,
            Self::ErrorRate => stats.error_rate,
            Self::Throughput => stats.throughput_per_sec,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::SuccessRate => "successRate",
            Self::ErrorRate => "errorRate",
            Self::Throughput => "throughput",
        }
    }
}

impl Comparison {
    pub fn evaluate(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Gt => value > threshold,
            Self::Lt => value < threshold,
            Self::Eq => (value - threshold).abs() < EQ_TOLERANCE,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "==",
        }
    }
}

impl AlertRule {
    pub fn applies_to(&self, operation: &str) -> bool {
        self.operation == WILDCARD || self.operation == operation
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.id.trim().is_empty() {
            return Err(RuleError::EmptyId);
        }
        if self.operation.trim().is_empty() {
            return Err(RuleError::EmptyOperation);
        }
        if !self.threshold.is_finite() {
            return Err(RuleError::NonFiniteThreshold);
        }
        if self.comparison == Comparison::Eq && self.threshold == 0.0 {
            return Err(RuleError::ZeroThresholdEquality);
        }
        if self.time_window_ms < 0 {
            return Err(RuleError::NegativeWindow);
        }
        if self.cooldown_ms < 0 {
            return Err(RuleError::NegativeCooldown);
        }
        Ok(())
    }
}

/// Rules installed on every engine unless disabled in configuration.
pub fn default_rules() -> Vec<AlertRule> {
    let rule = |id: &str, metric: Metric, threshold: f64, comparison: Comparison| AlertRule {
        id: id.into(),
        operation: WILDCARD.into(),
        metric,
        threshold,
        comparison,
        time_window_ms: DEFAULT_WINDOW_MS,
        cooldown_ms: DEFAULT_COOLDOWN_MS,
        enabled: true,
    };
    vec![
        rule("default-response-time", Metric::Duration, 5000.0, Comparison::Gt),
        rule("default-error-rate", Metric::ErrorRate, 0.1, Comparison::Gt),
        rule("default-success-rate", Metric::SuccessRate, 0.9, Comparison::Lt),
    ]
}

fn yes() -> bool {
    true
}
