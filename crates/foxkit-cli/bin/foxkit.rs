//! foxkit binary entry point.
//!
//! This is a thin wrapper around the foxkit-cli library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Runs the selected command

use anyhow::{Context, Result};
use clap::Parser;
use foxkit_cli::{Cli, commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log filter '{directive}'"))?,
        None if cli.verbose => EnvFilter::new(cli.default_log_level()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level())),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.resolve_command()?;
    tracing::debug!("Running {command:?}");

    commands::execute(&cli, &command).with_context(|| format!("{command:?} failed"))?;
    Ok(())
}
