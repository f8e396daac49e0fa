use serde::{Deserialize, Serialize};

/// Per `(rule, operation)` firing state. Firing is the only transition;
/// there is no resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CooldownState {
    Idle,
    CoolingDown { since_ms: i64 },
}

impl CooldownState {
    pub fn can_fire(self, now_ms: i64, cooldown_ms: i64) -> bool {
        match self {
            Self::Idle => true,
            Self::CoolingDown { since_ms } => now_ms - since_ms >= cooldown_ms,
        }
    }

    /// The state as observed at `now_ms`: a cooldown that has run out reads
    /// as idle.
    pub fn at(self, now_ms: i64, cooldown_ms: i64) -> Self {
        match self {
            Self::CoolingDown { .. } if self.can_fire(now_ms, cooldown_ms) => Self::Idle,
            other => other,
        }
    }

    pub fn fire(now_ms: i64) -> Self {
        Self::CoolingDown { since_ms: now_ms }
    }
}
