mod loader;
mod schema;

pub(crate) use loader::validate as validate_config;
pub use loader::{load_from_file, load_from_str, LoadError};
pub use schema::{HealthPolicy, MonitorConfig};
