//! The accumulator loop: reads lines, grows the buffer, fires on match.

use crate::decoder::LineDecoder;
use crate::pattern::TriggerPattern;
use crate::process::Invoker;
use crate::{Result, TriggerError};
use seqtrig_types::{DecodeMode, MalformedLinePolicy, SpawnFailurePolicy, TriggerLimit, WatchSummary};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, trace, warn};

/// Everything the loop needs besides its input and invoker.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Target sequence to detect
    pub sequence: String,
    pub mode: DecodeMode,
    pub limit: TriggerLimit,
    /// Drain input to EOF once the limit is reached instead of stopping
    pub keep_reading: bool,
    pub on_malformed: MalformedLinePolicy,
    pub on_spawn_failure: SpawnFailurePolicy,
}

impl WatchConfig {
    pub fn new(sequence: impl Into<String>, mode: DecodeMode) -> Self {
        Self {
            sequence: sequence.into(),
            mode,
            limit: TriggerLimit::Unbounded,
            keep_reading: false,
            on_malformed: MalformedLinePolicy::Fail,
            on_spawn_failure: SpawnFailurePolicy::Continue,
        }
    }
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Decoding lines and testing the pattern
    Reading,
    /// Limit reached; reading to EOF without decoding
    Draining,
}

/// Watches a line stream for the target sequence.
pub struct Watcher<I> {
    pattern: TriggerPattern,
    decoder: LineDecoder,
    buffer: String,
    config: WatchConfig,
    invoker: I,
    state: WatchState,
    summary: WatchSummary,
}

impl<I: Invoker> Watcher<I> {
    /// Compile the pattern and set up an empty buffer.
    pub fn new(config: WatchConfig, invoker: I) -> Result<Self> {
        let pattern = TriggerPattern::compile(&config.sequence, config.mode)?;
        let summary = WatchSummary {
            mode: config.mode,
            limit: config.limit,
            ..WatchSummary::default()
        };
        Ok(Self {
            pattern,
            decoder: LineDecoder::new(config.mode),
            buffer: String::new(),
            config,
            invoker,
            state: WatchState::Reading,
            summary,
        })
    }

    /// Run until end of input, or until the trigger limit is reached when
    /// not keeping reading.
    ///
    /// Without `keep_reading`, no line is read once the limit is reached.
    ///
    /// Lines are split on `\n` with an optional trailing `\r` removed, and
    /// are not required to be UTF-8; see [`LineDecoder::decode`].
    ///
    /// The buffer only shrinks on a match and every appended line re-searches
    /// all of it, so a long run without a match costs time quadratic in the
    /// buffer length.
    pub async fn run<R>(&mut self, reader: R) -> Result<WatchSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(
            target: "seqtrig::watch",
            "Watching for {:?} (mode: {}, limit: {}, keep reading: {})",
            self.config.sequence,
            self.config.mode,
            self.config.limit,
            self.config.keep_reading
        );

        let mut lines = reader.split(b'\n');
        loop {
            if self.state == WatchState::Reading && self.config.limit.is_reached(self.summary.triggers) {
                if !self.config.keep_reading {
                    debug!(target: "seqtrig::watch", "Trigger limit reached, stopping");
                    break;
                }
                debug!(target: "seqtrig::watch", "Trigger limit reached, draining input");
                self.state = WatchState::Draining;
            }

            let Some(mut line) = lines.next_segment().await? else {
                debug!(target: "seqtrig::watch", "End of input");
                break;
            };
            self.summary.lines_read += 1;

            if self.state == WatchState::Draining {
                self.summary.lines_drained += 1;
                continue;
            }

            if line.last() == Some(&b'\r') {
                line.pop();
            }
            self.process_line(&line)?;
        }

        info!(
            target: "seqtrig::watch",
            "Finished: {} lines read, {} triggers",
            self.summary.lines_read,
            self.summary.triggers
        );
        Ok(self.summary)
    }

    /// Decode one line, append it, and fire if the buffer now matches.
    fn process_line(&mut self, line: &[u8]) -> Result<()> {
        let line_number = self.summary.lines_read;
        let decoded = match self.decoder.decode(line, line_number) {
            Ok(decoded) => decoded,
            Err(err @ TriggerError::MalformedLine { .. }) => match self.config.on_malformed {
                MalformedLinePolicy::Fail => return Err(err),
                MalformedLinePolicy::Skip => {
                    warn!(target: "seqtrig::decode", "Skipping: {}", err);
                    self.summary.malformed_skipped += 1;
                    return Ok(());
                }
            },
            Err(err) => return Err(err),
        };

        self.buffer.push_str(&decoded);
        trace!(target: "seqtrig::watch", "Buffer: {:?}", self.buffer);

        if self.pattern.is_match(&self.buffer) {
            self.buffer.clear();
            self.summary.triggers += 1;
            info!(
                target: "seqtrig::watch",
                "Sequence detected on line {} (trigger {})",
                line_number,
                self.summary.triggers
            );
            self.fire()?;
        }
        Ok(())
    }

    fn fire(&mut self) -> Result<()> {
        match self.invoker.invoke() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.summary.spawn_failures += 1;
                match self.config.on_spawn_failure {
                    SpawnFailurePolicy::Abort => Err(err),
                    SpawnFailurePolicy::Continue => {
                        warn!(target: "seqtrig::invoke", "{}; still watching", err);
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn summary(&self) -> WatchSummary {
        self.summary
    }

    pub fn pattern(&self) -> &TriggerPattern {
        &self.pattern
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }
}
