//! Command-line surface of the `seqtrig` binary.

use crate::logging::{LogConfig, LogFormat, LogOverride};
use clap::Parser;
use seqtrig_core::WatchConfig;
use seqtrig_types::{DecodeMode, MalformedLinePolicy, SpawnFailurePolicy, TriggerLimit};

/// Trigger a command when a specific sequence is read from stdin.
///
/// Options must come before COMMAND_ARG: everything from the first command
/// argument on is passed to the command unchanged.
#[derive(Parser, Debug)]
#[command(name = "seqtrig")]
#[command(about = "Trigger a command when a specific sequence is read from stdin")]
#[command(version)]
pub struct Cli {
    /// Sequence to be accepted. Spaces are optional separators.
    pub sequence: String,

    /// Command and arguments to execute when the sequence is hit
    #[arg(
        value_name = "COMMAND_ARG",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 1..
    )]
    pub command_arg: Vec<String>,

    /// Keep reading until EOF once the trigger count is exhausted
    #[arg(long)]
    pub keep_reading: bool,

    /// How many times the command may be triggered; negative repeats indefinitely
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    pub count: i64,

    /// Input format: "symbols" (trailing [a b] frames) or "brackets" (verbatim lines)
    #[arg(short, long, value_name = "MODE", default_value = "symbols")]
    pub mode: DecodeMode,

    /// What to do with lines lacking a trailing [...] group: "fail" or "skip"
    #[arg(long = "on-malformed", value_name = "POLICY", default_value = "fail")]
    pub on_malformed: MalformedLinePolicy,

    /// Stop watching if the command cannot be started
    #[arg(long)]
    pub abort_on_spawn_error: bool,

    /// Print run statistics as JSON on stderr at exit
    #[arg(long)]
    pub summary: bool,

    /// Enable verbose logging (triggers and spawned processes)
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace logging (every line and buffer state)
    #[arg(long)]
    pub trace: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Set log level for one area: startup, pattern, decode, watch or invoke
    /// (e.g., "watch=debug"). Repeatable or comma separated.
    #[arg(long = "log", value_name = "TARGET=LEVEL", value_delimiter = ',')]
    pub log_overrides: Vec<LogOverride>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_flags(
            self.verbose,
            self.debug,
            self.trace,
            self.quiet,
            self.log_overrides.clone(),
            self.log_format,
        )
    }

    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            sequence: self.sequence.clone(),
            mode: self.mode,
            limit: TriggerLimit::from_count(self.count),
            keep_reading: self.keep_reading,
            on_malformed: self.on_malformed,
            on_spawn_failure: if self.abort_on_spawn_error {
                SpawnFailurePolicy::Abort
            } else {
                SpawnFailurePolicy::Continue
            },
        }
    }
}
