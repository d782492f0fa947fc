#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays one Bastion match over the engine's line protocol.

mod protocol;

use std::{fs, io, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use bastion_strategy::StrategyConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the `bastion` binary.
#[derive(Debug, Parser)]
#[command(name = "bastion", about = "Turn decision engine for the tower-defence match protocol")]
struct CliArgs {
    /// TOML file overriding the default strategy tuning.
    #[arg(long, value_name = "PATH")]
    strategy: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset (for example `debug` or `bastion_strategy=trace`).
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log_level: String,
}

/// Entry point for the Bastion command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(&args.log_level)?;

    let tuning = load_tuning(args.strategy.as_ref())?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = protocol::play(stdin.lock(), stdout.lock(), tuning)?;
    if !summary.finished {
        tracing::warn!(turns = summary.turns, "engine closed the stream before the match ended");
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter `{level}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!(error))
        .context("failed to install the log subscriber")
}

fn load_tuning(path: Option<&PathBuf>) -> Result<StrategyConfig> {
    let Some(path) = path else {
        return Ok(StrategyConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read strategy file {}", path.display()))?;
    let tuning = StrategyConfig::from_toml(&contents)
        .with_context(|| format!("failed to parse strategy file {}", path.display()))?;
    tracing::info!(path = %path.display(), "strategy tuning loaded");
    Ok(tuning)
}
