mod exposition;
mod export;
mod health;
mod summary;

pub use exposition::{render_prometheus, sanitize_name};
pub use export::{ExportError, ExportFormat, JsonExport};
pub use health::{evaluate_health, HealthStatus};
pub use summary::{build_summary, SlowOperation, Summary, SLOWEST_LIMIT};
