//! Bound on the number of command invocations.

use serde::Serialize;
use std::fmt;

/// Maximum number of triggers for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerLimit {
    /// Fire on every match until end of input.
    #[default]
    Unbounded,
    /// Stop firing once this many triggers have happened.
    AtMost(u64),
}

impl TriggerLimit {
    /// Build a limit from a CLI count, where any negative value means unbounded.
    pub fn from_count(count: i64) -> Self {
        u64::try_from(count).map_or(TriggerLimit::Unbounded, TriggerLimit::AtMost)
    }

    /// Whether `triggers` invocations exhaust this limit.
    pub fn is_reached(&self, triggers: u64) -> bool {
        match self {
            TriggerLimit::Unbounded => false,
            TriggerLimit::AtMost(max) => triggers >= *max,
        }
    }
}

impl fmt::Display for TriggerLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerLimit::Unbounded => f.write_str("unbounded"),
            TriggerLimit::AtMost(max) => write!(f, "{}", max),
        }
    }
}
