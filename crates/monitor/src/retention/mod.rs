mod sweeper;
mod task;

pub use sweeper::{RetentionManager, SweepReport};
pub use task::{spawn_sweeper, SweepHandle};
