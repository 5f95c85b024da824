//! seqtrig - run a command whenever a target sequence appears on stdin.

use anyhow::{Context, Result};
use clap::Parser;
use seqtrig_cli::{args::Cli, logging};
use seqtrig_core::{CommandInvoker, Watcher};
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_config());

    let config = cli.watch_config();
    let invoker =
        CommandInvoker::new(cli.command_arg.clone()).context("Invalid trigger command")?;
    tracing::info!(
        target: "seqtrig::startup",
        "Trigger command: {} {:?}",
        invoker.program(),
        invoker.args()
    );

    let mut watcher = Watcher::new(config, invoker)
        .with_context(|| format!("Cannot watch for sequence {:?}", cli.sequence))?;
    tracing::debug!(
        target: "seqtrig::startup",
        "Pattern: {}",
        watcher.pattern().as_str()
    );

    let result = watcher.run(BufReader::new(tokio::io::stdin())).await;

    if cli.summary {
        eprintln!("{}", serde_json::to_string(&watcher.summary())?);
    }

    result.context("Stopped watching stdin")?;
    Ok(())
}
