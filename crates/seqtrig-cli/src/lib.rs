//! seqtrig command-line library.
//!
//! Argument parsing and logging setup for the `seqtrig` binary, separated
//! from main.rs to enable integration testing.

pub mod args;
pub mod logging;
