//! jwt-codec: encode, decode and verify JSON Web Tokens from the terminal.
//!
//! Entry point for the application. Parses CLI arguments, installs the
//! log subscriber and delegates to the appropriate command handler.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod display;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "JWT_CODEC_LOG";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Parse CLI arguments and dispatch to the appropriate command handler.
///
/// Returns `ExitCode` so the caller can exit without `process::exit`,
/// allowing all destructors (including `Zeroizing`) to run.
fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Encode(args) => commands::encode::execute(args)?,
        Commands::Decode(args) => commands::decode::execute(args)?,
        Commands::Inspect(args) => commands::inspect::execute(args)?,
        Commands::Keygen(args) => commands::keygen::execute(args)?,
        Commands::Algorithms => commands::algorithms::execute(),
    }
    Ok(ExitCode::SUCCESS)
}

/// Log to stderr so that stdout carries only command output.
fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "jwt_codec=debug"
    } else {
        "jwt_codec=warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
