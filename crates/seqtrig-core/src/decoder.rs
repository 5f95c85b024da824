//! Line decoding: turns one input line into text appended to the buffer.

use crate::{Result, TriggerError};
use once_cell::sync::Lazy;
use regex::Regex;
use seqtrig_types::DecodeMode;
use std::collections::BTreeSet;
use tracing::trace;

/// Marker appended for a frame with no active symbols.
pub const GAP_MARKER: char = ' ';

/// Trailing `[...]` group at the end of a symbols-mode line.
static TRAILING_GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]$").expect("Invalid trailing group regex")
});

/// Set of symbols reported active on one line.
pub type SymbolSet = BTreeSet<String>;

/// Parse the trailing `[a b ...]` group of a line into a symbol set.
///
/// Returns `None` when the line does not end with a bracket group.
pub fn parse_symbols(line: &str) -> Option<SymbolSet> {
    let caps = TRAILING_GROUP_RE.captures(line)?;
    let inner = caps.get(1).map_or("", |m| m.as_str());
    Some(
        inner
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Diff a freshly parsed set against the previous line's set.
///
/// Returns `(new_previous, activated)`: the parsed set replaces the previous
/// one wholesale, and `activated` holds only symbols absent from `previous`.
pub fn diff_active(previous: &SymbolSet, parsed: SymbolSet) -> (SymbolSet, SymbolSet) {
    let activated = parsed.difference(previous).cloned().collect();
    (parsed, activated)
}

/// Symbols active on the most recently decoded line.
#[derive(Debug, Default, Clone)]
pub struct ActiveSymbols {
    previous: SymbolSet,
}

impl ActiveSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one parsed line, returning the text to append.
    pub fn advance(&mut self, parsed: SymbolSet) -> String {
        let (previous, activated) = diff_active(&self.previous, parsed);
        self.previous = previous;

        if self.previous.is_empty() && activated.is_empty() {
            return GAP_MARKER.to_string();
        }
        // BTreeSet iterates in lexicographic order
        activated.into_iter().collect()
    }

    pub fn previous(&self) -> &SymbolSet {
        &self.previous
    }
}

/// Decoder for one input stream.
#[derive(Debug, Clone)]
pub enum LineDecoder {
    Symbols(ActiveSymbols),
    Brackets,
}

impl LineDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        match mode {
            DecodeMode::Symbols => LineDecoder::Symbols(ActiveSymbols::new()),
            DecodeMode::Brackets => LineDecoder::Brackets,
        }
    }

    /// Decode one raw line (without its line terminator) into buffer content.
    ///
    /// `line_number` is 1-based and only used for error reporting. A
    /// malformed line leaves the decoder state untouched. In symbols mode a
    /// line that is not valid UTF-8 is malformed; in brackets mode invalid
    /// bytes are replaced with U+FFFD and the line is appended as usual.
    pub fn decode(&mut self, raw: &[u8], line_number: u64) -> Result<String> {
        match self {
            LineDecoder::Symbols(active) => {
                let malformed = || TriggerError::MalformedLine {
                    line_number,
                    line: String::from_utf8_lossy(raw).into_owned(),
                };
                let line = std::str::from_utf8(raw).map_err(|_| malformed())?;
                let parsed = parse_symbols(line).ok_or_else(malformed)?;
                let decoded = active.advance(parsed);
                trace!(
                    target: "seqtrig::decode",
                    "Line {}: active {:?}, appending {:?}",
                    line_number,
                    active.previous(),
                    decoded
                );
                Ok(decoded)
            }
            LineDecoder::Brackets => Ok(String::from_utf8_lossy(raw).into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(symbols: &[&str]) -> SymbolSet {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols("t=12 [a b]"), Some(set(&["a", "b"])));
        assert_eq!(parse_symbols("[]"), Some(set(&[])));
        assert_eq!(parse_symbols("frame [c]"), Some(set(&["c"])));
    }

    #[test]
    fn test_parse_symbols_ignores_doubled_spaces() {
        assert_eq!(parse_symbols("[a  b]"), Some(set(&["a", "b"])));
        assert_eq!(parse_symbols("[ ]"), Some(set(&[])));
    }

    #[test]
    fn test_parse_symbols_only_trailing_group() {
        // Earlier groups are ignored; only the one at end of line counts
        assert_eq!(parse_symbols("[x] [y]"), Some(set(&["y"])));
        assert_eq!(parse_symbols("[a] trailing"), None);
        assert_eq!(parse_symbols("no brackets"), None);
        assert_eq!(parse_symbols(""), None);
    }

    #[test]
    fn test_diff_active() {
        let (previous, activated) = diff_active(&set(&["a"]), set(&["a", "b"]));
        assert_eq!(previous, set(&["a", "b"]));
        assert_eq!(activated, set(&["b"]));

        // Previous is replaced, not unioned
        let (previous, activated) = diff_active(&set(&["a", "b"]), set(&["c"]));
        assert_eq!(previous, set(&["c"]));
        assert_eq!(activated, set(&["c"]));
    }

    #[test]
    fn test_advance_sorts_activated() {
        let mut active = ActiveSymbols::new();
        assert_eq!(active.advance(set(&["c", "a", "b"])), "abc");
    }

    #[test]
    fn test_advance_held_symbols_append_nothing() {
        let mut active = ActiveSymbols::new();
        assert_eq!(active.advance(set(&["a"])), "a");
        assert_eq!(active.advance(set(&["a"])), "");
    }

    #[test]
    fn test_advance_empty_frame_appends_gap() {
        let mut active = ActiveSymbols::new();
        assert_eq!(active.advance(set(&[])), " ");
        assert_eq!(active.advance(set(&["a"])), "a");
        assert_eq!(active.advance(set(&[])), " ");
        assert_eq!(active.advance(set(&[])), " ");
    }

    #[test]
    fn test_decode_symbols_scenario() {
        let mut decoder = LineDecoder::new(DecodeMode::Symbols);
        let lines = ["[a]", "[a b]", "[]", "[]", "[b]"];
        let decoded: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| decoder.decode(line.as_bytes(), i as u64 + 1).unwrap())
            .collect();
        assert_eq!(decoded, vec!["a", "b", " ", " ", "b"]);
    }

    #[test]
    fn test_decode_malformed_keeps_state() {
        let mut decoder = LineDecoder::new(DecodeMode::Symbols);
        decoder.decode(b"[a]", 1).unwrap();

        let err = decoder.decode(b"garbage", 2).unwrap_err();
        match err {
            TriggerError::MalformedLine { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "garbage");
            }
            other => panic!("Expected MalformedLine, got {:?}", other),
        }

        // `a` is still held, so it is not reactivated
        assert_eq!(decoder.decode(b"[a]", 3).unwrap(), "");
    }

    #[test]
    fn test_decode_brackets_is_verbatim() {
        let mut decoder = LineDecoder::new(DecodeMode::Brackets);
        assert_eq!(decoder.decode(b"foo[x]bar", 1).unwrap(), "foo[x]bar");
        assert_eq!(decoder.decode(b"no brackets at all", 2).unwrap(), "no brackets at all");
    }

    #[test]
    fn test_decode_symbols_invalid_utf8_is_malformed() {
        let mut decoder = LineDecoder::new(DecodeMode::Symbols);
        decoder.decode(b"[a]", 1).unwrap();

        let err = decoder.decode(b"\xff\xfe [b]", 2).unwrap_err();
        match err {
            TriggerError::MalformedLine { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "\u{FFFD}\u{FFFD} [b]");
            }
            other => panic!("Expected MalformedLine, got {:?}", other),
        }

        // State untouched: `a` is still held
        assert_eq!(decoder.decode(b"[a b]", 3).unwrap(), "b");
    }

    #[test]
    fn test_decode_brackets_replaces_invalid_utf8() {
        let mut decoder = LineDecoder::new(DecodeMode::Brackets);
        assert_eq!(decoder.decode(b"\xff[x]", 1).unwrap(), "\u{FFFD}[x]");
    }
}
