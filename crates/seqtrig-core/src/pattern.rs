//! Compiles a target sequence into the regex tested against the buffer.

use crate::{Result, TriggerError};
use regex::Regex;
use seqtrig_types::DecodeMode;
use tracing::debug;

/// Optional gap marker following a symbol.
const SYMBOLS_SEPARATOR: &str = "(?: )?";
/// Optional empty frame following a bracketed symbol.
const BRACKETS_SEPARATOR: &str = r"(?:\[\])?";

/// A compiled target sequence.
#[derive(Debug, Clone)]
pub struct TriggerPattern {
    regex: Regex,
}

impl TriggerPattern {
    /// Compile `sequence` for the given decode mode.
    ///
    /// Spaces in the sequence are separators: they never require a character
    /// of their own. Every other character is escaped, so metacharacters in
    /// the sequence are matched literally.
    pub fn compile(sequence: &str, mode: DecodeMode) -> Result<Self> {
        let source = pattern_source(sequence, mode)?;
        debug!(target: "seqtrig::pattern", "Compiled {:?} ({}) to {}", sequence, mode, source);
        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    /// Search the buffer for the sequence anywhere in it.
    pub fn is_match(&self, buffer: &str) -> bool {
        self.regex.is_match(buffer)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Build the regex source for a sequence without compiling it.
pub fn pattern_source(sequence: &str, mode: DecodeMode) -> Result<String> {
    if sequence.chars().all(|c| c == ' ') {
        return Err(TriggerError::EmptySequence);
    }

    let mut source = String::new();
    let mut buf = [0u8; 4];
    for c in sequence.chars() {
        match (mode, c) {
            (DecodeMode::Symbols, ' ') => source.push_str(SYMBOLS_SEPARATOR),
            (DecodeMode::Brackets, ' ') => {}
            (DecodeMode::Symbols, c) => {
                source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                source.push_str(SYMBOLS_SEPARATOR);
            }
            (DecodeMode::Brackets, c) => {
                source.push_str(r"\[");
                source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                source.push_str(r"\]");
                source.push_str(BRACKETS_SEPARATOR);
            }
        }
    }
    Ok(source)
}
