mod percentile;
mod stats;

pub use percentile::percentile;
pub use stats::{aggregate, OperationStats};
