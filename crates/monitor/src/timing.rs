use std::time::Instant;

use crate::alert::Alert;
use crate::monitor::PerformanceMonitor;
use crate::sample::{ResourceDelta, Sample, SampleMetadata};

pub const CANCELLED_KIND: &str = "Cancelled";

/// An in-flight measurement. Finishing it records exactly one sample;
/// dropping it unfinished records a cancelled failure with the time elapsed
/// so far.
#[must_use = "dropping a Timing records the operation as cancelled"]
pub struct Timing {
    monitor: PerformanceMonitor,
    operation: String,
    started: Instant,
    memory_before: Option<u64>,
    metadata: SampleMetadata,
    done: bool,
}

impl Timing {
    pub(crate) fn start(monitor: PerformanceMonitor, operation: String) -> Self {
        let memory_before = monitor.probe().memory_used_bytes();
        Self {
            monitor,
            operation,
            started: Instant::now(),
            memory_before,
            metadata: SampleMetadata::default(),
            done: false,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Only the free-form fields are taken; failure fields are set from the
    /// outcome.
    pub(crate) fn merge_metadata(&mut self, metadata: SampleMetadata) {
        self.metadata.extra.extend(metadata.extra);
    }

    pub fn finish(mut self, success: bool) -> Vec<Alert> {
        self.complete(success)
    }

    pub fn fail(mut self, kind: impl Into<String>, message: impl Into<String>) -> Vec<Alert> {
        self.metadata.error_kind = Some(kind.into());
        self.metadata.error_message = Some(message.into());
        self.complete(false)
    }

    fn complete(&mut self, success: bool) -> Vec<Alert> {
        self.done = true;
        let duration_ms = self.elapsed_ms();
        let memory_after = self.monitor.probe().memory_used_bytes();
        let resource_delta = match (self.memory_before, memory_after) {
            (Some(before), Some(after)) => Some(ResourceDelta {
                memory_bytes: after as i64 - before as i64,
            }),
            _ => None,
        };

        let sample = Sample::new(
            std::mem::take(&mut self.operation),
            duration_ms,
            success,
            self.monitor.now_ms(),
        )
        .with_metadata(std::mem::take(&mut self.metadata))
        .with_resource_delta(resource_delta);

        self.monitor.record_metric(sample)
    }
}

impl Drop for Timing {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        tracing::debug!(operation = %self.operation, "timing dropped before completion");
        self.metadata.error_kind = Some(CANCELLED_KIND.into());
        self.metadata.error_message = Some("operation cancelled before completion".into());
        self.complete(false);
    }
}

/// Short type name of an error, used as the sample's error kind.
pub(crate) fn error_kind<E>() -> String {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct QueryTimeout;

    #[test]
    fn error_kind_is_short_type_name() {
        assert_eq!(error_kind::<QueryTimeout>(), "QueryTimeout");
        assert_eq!(error_kind::<std::io::Error>(), "Error");
        assert_eq!(error_kind::<Box<dyn std::error::Error>>(), "Box");
        assert_eq!(error_kind::<String>(), "String");
    }
}
