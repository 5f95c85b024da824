//! Policies for the two recoverable failure kinds.

/// What to do with an input line that lacks the trailing `[...]` group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedLinePolicy {
    /// Stop watching and report the line.
    #[default]
    Fail,
    /// Log the line and keep watching.
    Skip,
}

impl std::str::FromStr for MalformedLinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(MalformedLinePolicy::Fail),
            "skip" => Ok(MalformedLinePolicy::Skip),
            _ => Err(format!(
                "Invalid malformed-line policy: '{}'. Use 'fail' or 'skip'.",
                s
            )),
        }
    }
}

/// What to do when the trigger command cannot be started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpawnFailurePolicy {
    /// Log a warning and keep watching input.
    #[default]
    Continue,
    /// Stop watching and report the error.
    Abort,
}
