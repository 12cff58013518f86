//! Command-line front end: argument model, file handling and dispatch
//!
//! This is the only layer that opens files. The ledger core receives
//! already-open readers and writers.

use crate::blockchain::BlockChain;
use crate::config::{Config, FormatConfig};
use crate::error::{ChainError, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Printed on stderr when the arguments cannot be parsed.
pub const USAGE: &str = "Usage: ./mtm_blockchain <op> <source> <target> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    /// Rewrite the source ledger as a plain dump
    Format,
    /// Write the fingerprint of every transaction
    Hash,
    /// Merge adjacent transfers between the same parties, then dump
    Compress,
    /// Check a fingerprint file against the source ledger
    Verify,
}

#[derive(Debug, Parser)]
#[command(name = "mtm_blockchain", version, about = "Checksummed transaction ledger tool")]
pub struct Cli {
    /// Operation to perform
    #[arg(value_enum)]
    pub op: Operation,

    /// Ledger file in plain dump format
    pub source: PathBuf,

    /// Output file, or the fingerprint file for `verify`
    pub target: PathBuf,

    /// Configuration file (defaults to ./hashledger.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn verification_message(status: bool) -> String {
    format!("Verification {}", if status { "passed" } else { "failed" })
}

/// Opens and parses a ledger file.
pub fn load_chain_from_path(path: &Path, format: &FormatConfig) -> Result<BlockChain> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    BlockChain::load_with(BufReader::new(file), format)
}

/// Runs one operation. Messages meant for the user go to `out`.
pub fn run<W: Write>(cli: &Cli, config: &Config, out: &mut W) -> Result<()> {
    let mut chain = load_chain_from_path(&cli.source, &config.format)?;
    info!(
        "Loaded {} blocks from {}",
        chain.len(),
        cli.source.display()
    );

    match cli.op {
        Operation::Format => write_target(&cli.target, |writer| chain.dump(writer)),
        Operation::Hash => write_target(&cli.target, |writer| chain.dump_hashed(writer)),
        Operation::Compress => {
            chain.compress()?;
            info!("Compressed ledger has {} blocks", chain.len());
            write_target(&cli.target, |writer| chain.dump(writer))
        }
        Operation::Verify => {
            let file = File::open(&cli.target).map_err(|e| io_error(&cli.target, e))?;
            let status = chain.verify_file(BufReader::new(file))?;
            writeln!(out, "{}", verification_message(status))?;
            Ok(())
        }
    }
}

fn write_target<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn io_error(path: &Path, err: std::io::Error) -> ChainError {
    ChainError::IoError(format!("{}: {}", path.display(), err))
}
