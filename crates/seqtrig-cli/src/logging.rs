//! Logging setup for the `seqtrig` binary.
//!
//! One base level for every `seqtrig::*` target, picked from the verbosity
//! flags, plus optional per-target overrides. `RUST_LOG` replaces both when
//! set. Output goes to stderr; stdout belongs to the triggered commands.

use std::fmt;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Areas of seqtrig that emit log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Command line and trigger command setup
    Startup,
    /// Sequence compilation
    Pattern,
    /// Per-line decoding and skipped lines
    Decode,
    /// Loop state, buffer and detected sequences
    Watch,
    /// Spawned commands and spawn failures
    Invoke,
}

impl LogTarget {
    pub const ALL: [LogTarget; 5] = [
        LogTarget::Startup,
        LogTarget::Pattern,
        LogTarget::Decode,
        LogTarget::Watch,
        LogTarget::Invoke,
    ];

    /// Full tracing target name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTarget::Startup => "seqtrig::startup",
            LogTarget::Pattern => "seqtrig::pattern",
            LogTarget::Decode => "seqtrig::decode",
            LogTarget::Watch => "seqtrig::watch",
            LogTarget::Invoke => "seqtrig::invoke",
        }
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogTarget {
    type Err = String;

    /// Accepts both `watch` and `seqtrig::watch`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let short = name.strip_prefix("seqtrig::").unwrap_or(name);
        LogTarget::ALL
            .into_iter()
            .find(|target| target.as_str().ends_with(&format!("::{}", short.to_lowercase())))
            .ok_or_else(|| {
                format!(
                    "Unknown log target: '{}'. Use one of startup, pattern, decode, watch, invoke.",
                    name
                )
            })
    }
}

/// A `TARGET=LEVEL` override from `--log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOverride {
    pub target: LogTarget,
    pub level: Level,
}

impl FromStr for LogOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, level) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid log override: '{}'. Expected TARGET=LEVEL.", s))?;
        let level = level
            .trim()
            .parse::<Level>()
            .map_err(|e| format!("Invalid level in '{}': {}", s, e))?;
        Ok(Self {
            target: target.parse()?,
            level,
        })
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for every seqtrig target
    pub level: Level,
    pub overrides: Vec<LogOverride>,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            overrides: Vec::new(),
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Pick the base level from the verbosity flags.
    ///
    /// `quiet` wins, then the most detailed flag given. Without flags only
    /// warnings are shown: spawn failures and skipped lines.
    pub fn from_flags(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        overrides: Vec<LogOverride>,
        format: LogFormat,
    ) -> Self {
        let level = if quiet {
            Level::ERROR
        } else if trace {
            Level::TRACE
        } else if debug {
            Level::DEBUG
        } else if verbose {
            Level::INFO
        } else {
            Level::WARN
        };
        Self {
            level,
            overrides,
            format,
        }
    }

    /// Filter directives, e.g. `warn,seqtrig=info,seqtrig::decode=trace`.
    ///
    /// Dependencies stay at `warn` (`error` when quiet).
    pub fn directives(&self) -> String {
        // More verbose levels compare greater
        let base = self.level.min(Level::WARN);
        let mut directives = vec![base.to_string(), format!("seqtrig={}", self.level)];
        directives.extend(
            self.overrides
                .iter()
                .map(|o| format!("{}={}", o.target, o.level)),
        );
        directives.join(",").to_lowercase()
    }

    /// Build an EnvFilter, preferring `RUST_LOG` when it is set.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::try_new(self.directives()).unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install the global subscriber, writing to stderr.
pub fn init(config: &LogConfig) {
    let registry = tracing_subscriber::registry().with(config.build_filter());

    match config.format {
        LogFormat::Text => registry
            .with(
                fmt_layer::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                fmt_layer::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> LogConfig {
        LogConfig::from_flags(verbose, debug, trace, quiet, vec![], LogFormat::Text)
    }

    #[test]
    fn test_default_shows_warnings_only() {
        assert_eq!(flags(false, false, false, false).directives(), "warn,seqtrig=warn");
        assert_eq!(LogConfig::default().directives(), "warn,seqtrig=warn");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(flags(true, false, false, false).directives(), "warn,seqtrig=info");
        assert_eq!(flags(true, true, false, false).directives(), "warn,seqtrig=debug");
        assert_eq!(flags(false, true, true, false).directives(), "warn,seqtrig=trace");
        // Quiet beats everything and also quiets dependencies
        assert_eq!(flags(true, true, true, true).directives(), "error,seqtrig=error");
    }

    #[test]
    fn test_override_parsing() {
        let o: LogOverride = "decode=trace".parse().unwrap();
        assert_eq!(o.target, LogTarget::Decode);
        assert_eq!(o.level, Level::TRACE);

        let o: LogOverride = "seqtrig::invoke=INFO".parse().unwrap();
        assert_eq!(o.target, LogTarget::Invoke);
        assert_eq!(o.level, Level::INFO);

        assert!("watch".parse::<LogOverride>().is_err());
        assert!("buffer=debug".parse::<LogOverride>().is_err());
        assert!("watch=loud".parse::<LogOverride>().is_err());
    }

    #[test]
    fn test_overrides_appended_after_base() {
        let config = LogConfig::from_flags(
            false,
            false,
            false,
            false,
            vec!["watch=debug".parse().unwrap(), "decode=trace".parse().unwrap()],
            LogFormat::Json,
        );
        assert_eq!(
            config.directives(),
            "warn,seqtrig=warn,seqtrig::watch=debug,seqtrig::decode=trace"
        );
    }

    #[test]
    fn test_every_target_round_trips() {
        for target in LogTarget::ALL {
            assert_eq!(target.as_str().parse::<LogTarget>().unwrap(), target);
        }
    }

    #[test]
    fn test_directives_are_valid_filters() {
        for config in [
            flags(false, false, false, false),
            flags(false, false, true, false),
            flags(false, false, false, true),
        ] {
            assert!(EnvFilter::try_new(config.directives()).is_ok());
        }
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
