use serde::Deserialize;

use crate::alert::{AlertRule, MAX_ALERTS_PER_OPERATION};
use crate::sample::MAX_SAMPLES_PER_OPERATION;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MonitorConfig {
    #[serde(default = "default_max_samples")]
    pub max_samples_per_operation: usize,
    #[serde(default = "default_max_alerts")]
    pub max_alerts_per_operation: usize,
    #[serde(default = "default_retention_ms")]
    pub retention_ms: i64,
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    #[serde(default = "default_summary_window_ms")]
    pub summary_window_ms: i64,
    #[serde(default = "yes")]
    pub install_default_rules: bool,
    #[serde(default = "yes")]
    pub resource_probe: bool,
    #[serde(default)]
    pub health: HealthPolicy,
    #[serde(default)]
    pub rules: Vec<AlertRule>,
}

/// Fixed global health thresholds, independent of user alert rules.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthPolicy {
    #[serde(default = "default_health_window_ms")]
    pub window_ms: i64,
    #[serde(default = "default_max_average_response_ms")]
    pub max_average_response_ms: f64,
    #[serde(default = "default_max_error_rate")]
    pub max_error_rate: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_samples_per_operation: default_max_samples(),
            max_alerts_per_operation: default_max_alerts(),
            retention_ms: default_retention_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            summary_window_ms: default_summary_window_ms(),
            install_default_rules: true,
            resource_probe: true,
            health: HealthPolicy::default(),
            rules: Vec::new(),
        }
    }
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            window_ms: default_health_window_ms(),
            max_average_response_ms: default_max_average_response_ms(),
            max_error_rate: default_max_error_rate(),
        }
    }
}

fn default_max_samples() -> usize {
    MAX_SAMPLES_PER_OPERATION
}

fn default_max_alerts() -> usize {
    MAX_ALERTS_PER_OPERATION
}

fn default_retention_ms() -> i64 {
    24 * 60 * 60 * 1000
}

fn default_sweep_interval_ms() -> u64 {
    5 * 60 * 1000
}

fn default_summary_window_ms() -> i64 {
    60 * 60 * 1000
}

fn default_health_window_ms() -> i64 {
    5 * 60 * 1000
}

fn default_max_average_response_ms() -> f64 {
    5000.0
}

fn default_max_error_rate() -> f64 {
    0.05
}

fn yes() -> bool {
    true
}
