//! In-process performance monitoring: wraps operations, keeps bounded
//! per-operation samples, derives rolling statistics, fires cooldown-gated
//! threshold alerts and exports the result as JSON or Prometheus text.

pub mod aggregator;
pub mod alert;
pub mod clock;
pub mod config;
pub mod metrics;
pub mod monitor;
pub mod observer;
pub mod probe;
pub mod report;
pub mod retention;
pub mod sample;
pub mod timing;

pub use aggregator::{aggregate, OperationStats};
pub use alert::{Alert, AlertRule, Comparison, Metric, RuleError, Severity};
pub use config::{HealthPolicy, LoadError, MonitorConfig};
pub use monitor::{MonitorBuilder, PerformanceMonitor};
pub use observer::{AlertObserver, ChannelObserver, MetricObserver, ObserverError, SubscriptionId};
pub use report::{ExportError, ExportFormat, HealthStatus, Summary};
pub use sample::{ResourceDelta, Sample, SampleMetadata};
pub use timing::Timing;
