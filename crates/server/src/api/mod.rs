mod alerts;
mod health;
mod metrics;
mod router;
mod rules;
mod stats;
mod timing;

pub use router::{router, serve, AppState};
