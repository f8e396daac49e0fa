use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded execution of an operation. Never mutated after recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub operation: String,
    pub duration_ms: f64,
    pub success: bool,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub metadata: SampleMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_delta: Option<ResourceDelta>,
}

/// Failure details are typed; anything else the caller wants to attach
/// goes in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDelta {
    pub memory_bytes: i64,
}

impl Sample {
    pub fn new(operation: impl Into<String>, duration_ms: f64, success: bool, timestamp_ms: i64) -> Self {
        Self {
            operation: operation.into(),
            duration_ms,
            success,
            timestamp_ms,
            metadata: SampleMetadata::default(),
            resource_delta: None,
        }
    }

    pub fn with_metadata(mut self, metadata: SampleMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_resource_delta(mut self, delta: Option<ResourceDelta>) -> Self {
        self.resource_delta = delta;
        self
    }
}

impl SampleMetadata {
    pub fn failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_kind: Some(kind.into()),
            error_message: Some(message.into()),
            extra: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.extra.insert(key.into(), value.into());
    }

    pub fn is_failure(&self) -> bool {
        self.error_kind.is_some()
    }
}
