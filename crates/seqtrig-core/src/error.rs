//! Error types for seqtrig.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Target sequence has no characters to match")]
    EmptySequence,

    #[error("Invalid trigger pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Malformed input on line {line_number}: expected trailing [...] group, got {line:?}")]
    MalformedLine { line_number: u64, line: String },

    #[error("Failed to spawn {program:?}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty trigger command")]
    EmptyCommand,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
