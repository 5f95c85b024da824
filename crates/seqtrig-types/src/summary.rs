//! End-of-run statistics.

use crate::{DecodeMode, TriggerLimit};
use serde::Serialize;

/// Counters reported when the watch loop finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatchSummary {
    /// Decode mode the run used
    pub mode: DecodeMode,
    /// Trigger limit the run used
    pub limit: TriggerLimit,
    /// Lines read from input, including drained and skipped lines
    pub lines_read: u64,
    /// Lines read after the trigger limit was reached
    pub lines_drained: u64,
    /// Malformed lines ignored under the skip policy
    pub malformed_skipped: u64,
    /// Matches that fired the command
    pub triggers: u64,
    /// Triggers whose command failed to start
    pub spawn_failures: u64,
}
