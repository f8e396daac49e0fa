#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    EmptyId,
    EmptyOperation,
    DuplicateId(String),
    NonFiniteThreshold,
    ZeroThresholdEquality,
    NegativeWindow,
    NegativeCooldown,
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "rule id must not be empty"),
            Self::EmptyOperation => write!(f, "rule operation must not be empty"),
            Self::DuplicateId(id) => write!(f, "rule id '{id}' already exists"),
            Self::NonFiniteThreshold => write!(f, "threshold must be a finite number"),
            Self::ZeroThresholdEquality => {
                write!(f, "equality comparison against a zero threshold is not allowed")
            }
            Self::NegativeWindow => write!(f, "timeWindowMs must be >= 0"),
            Self::NegativeCooldown => write!(f, "cooldownMs must be >= 0"),
        }
    }
}

impl std::error::Error for RuleError {}
