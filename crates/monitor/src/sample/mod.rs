mod record;
mod store;

pub use record::{ResourceDelta, Sample, SampleMetadata};
pub use store::{SampleStore, MAX_SAMPLES_PER_OPERATION};
