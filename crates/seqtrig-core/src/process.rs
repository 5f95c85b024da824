//! Command invocation on trigger.

use crate::{Result, TriggerError};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Something that runs when the target sequence is detected.
pub trait Invoker {
    /// Fire once. Must not block on the triggered work.
    fn invoke(&mut self) -> Result<()>;
}

/// Launches an external command, fire-and-forget.
///
/// The child is never waited on and its exit status is never observed.
/// Overlapping invocations are allowed: a slow command may still be running
/// when the next trigger fires. Children get a null stdin so they cannot
/// consume the watched stream, and inherit stdout and stderr. Tokio reaps
/// children whose handles have been dropped.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: String,
    args: Vec<String>,
}

impl CommandInvoker {
    /// Build an invoker from `[program, args...]`.
    pub fn new(command: Vec<String>) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or(TriggerError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Invoker for CommandInvoker {
    fn invoke(&mut self) -> Result<()> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| TriggerError::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        info!(
            target: "seqtrig::invoke",
            "Spawned {} (pid {:?})",
            self.program,
            child.id()
        );
        drop(child);
        debug!(target: "seqtrig::invoke", "Detached from {}", self.program);
        Ok(())
    }
}
