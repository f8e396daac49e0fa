mod error;
mod evaluator;
mod event;
mod rule;
mod state;
mod store;

pub use error::RuleError;
pub use evaluator::AlertEngine;
pub use event::{Alert, Severity};
pub use rule::{default_rules, AlertRule, Comparison, Metric, EQ_TOLERANCE, WILDCARD};
pub use state::CooldownState;
pub use store::{AlertStore, MAX_ALERTS_PER_OPERATION};
