use std::path::Path;

use super::schema::MonitorConfig;
use crate::alert::RuleError;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
    Rule(RuleError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::Rule(e) => write!(f, "rule: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<RuleError> for LoadError {
    fn from(e: RuleError) -> Self {
        Self::Rule(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<MonitorConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<MonitorConfig, LoadError> {
    let cfg: MonitorConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub(crate) fn validate(cfg: &MonitorConfig) -> Result<(), LoadError> {
    if cfg.max_samples_per_operation == 0 {
        return Err(LoadError::Validation(
            "max_samples_per_operation must be > 0".into(),
        ));
    }
    if cfg.max_alerts_per_operation == 0 {
        return Err(LoadError::Validation(
            "max_alerts_per_operation must be > 0".into(),
        ));
    }
    if cfg.retention_ms <= 0 {
        return Err(LoadError::Validation("retention_ms must be > 0".into()));
    }
    if cfg.sweep_interval_ms == 0 {
        return Err(LoadError::Validation("sweep_interval_ms must be > 0".into()));
    }
    if !(0.0..=1.0).contains(&cfg.health.max_error_rate) {
        return Err(LoadError::Validation(
            "health.max_error_rate must be within [0, 1]".into(),
        ));
    }
    for rule in &cfg.rules {
        rule.validate()?;
    }
    Ok(())
}
