use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::summary::Summary;
use crate::aggregator::OperationStats;
use crate::alert::Alert;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Prometheus,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "prometheus" | "prom" => Ok(Self::Prometheus),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Prometheus => "text/plain; version=0.0.4",
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    UnknownFormat(String),
    Json(serde_json::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFormat(name) => write!(f, "unknown export format '{name}'"),
            Self::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExport {
    pub timestamp: i64,
    pub summary: Summary,
    pub operations: BTreeMap<String, OperationStats>,
    pub alerts: Vec<Alert>,
}

impl JsonExport {
    pub fn render(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("prometheus".parse::<ExportFormat>().unwrap(), ExportFormat::Prometheus);
        let err = "csv".parse::<ExportFormat>().unwrap_err();
        assert!(err.to_string().contains("csv"));
    }
}
