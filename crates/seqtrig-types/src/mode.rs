//! Input decoding modes.

use serde::Serialize;
use std::fmt;

/// How a raw input line is turned into buffer content, and how the
/// target sequence is compiled to match it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Each line ends with `[a b ...]`; only newly-activated symbols are
    /// appended, with a gap marker for empty frames.
    #[default]
    Symbols,
    /// Lines are appended verbatim; symbols appear as `[x]` tokens.
    Brackets,
}

impl DecodeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeMode::Symbols => "symbols",
            DecodeMode::Brackets => "brackets",
        }
    }
}

impl fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "symbols" => Ok(DecodeMode::Symbols),
            "brackets" => Ok(DecodeMode::Brackets),
            _ => Err(format!(
                "Invalid decode mode: '{}'. Use 'symbols' or 'brackets'.",
                s
            )),
        }
    }
}
