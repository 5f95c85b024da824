//! Sequence detection over line streams for seqtrig.
//!
//! Lines are decoded into a growing buffer, the buffer is searched for the
//! compiled target sequence, and a command is launched on every match.

mod decoder;
mod error;
mod pattern;
mod process;
mod watcher;

pub use decoder::{diff_active, parse_symbols, ActiveSymbols, LineDecoder, SymbolSet, GAP_MARKER};
pub use error::TriggerError;
pub use pattern::{pattern_source, TriggerPattern};
pub use process::{CommandInvoker, Invoker};
pub use watcher::{WatchConfig, WatchState, Watcher};

/// Result type for seqtrig operations.
pub type Result<T> = std::result::Result<T, TriggerError>;
