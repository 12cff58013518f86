#![forbid(unsafe_code)]
//! Ledger tool: format, hash, compress or verify a ledger file

use clap::error::ErrorKind;
use clap::Parser;
use colored::*;
use hashledger::cli::{run, Cli, USAGE};
use hashledger::config::{load_config, LoggingConfig};
use hashledger::error::ChainError;
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{}", USAGE.red());
            let _ = err.print();
            return ExitCode::from(2);
        }
    };

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?} failed: {}", cli.op, e);
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<(), ChainError> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &config, &mut out)
}

/// Logs go to stderr so stdout stays free for ledger output. `RUST_LOG`
/// overrides the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), ChainError> {
    let level = logging.level_filter()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
