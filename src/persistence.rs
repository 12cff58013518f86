//! Text persistence for HashLedger
//!
//! Two output shapes are written:
//!
//! ```text
//! BlockChain info:            BlockChain Dump:
//! 1.                          1. 43650f21cb123cdef89a
//! Sender Name: Alice          2. bc12f0563437864ca333
//! Receiver Name: Bob
//! Transaction Value: 10
//! Transaction Timestamp: t1
//! ```
//!
//! The plain dump on the left can be read back with [`BlockChain::load`].
//! The fingerprint list on the right (or the same list without header and
//! numbering) is checked with [`BlockChain::verify_file`].
//!
//! Streams are owned by the caller; nothing here opens, flushes or closes
//! them.

use crate::blockchain::BlockChain;
use crate::config::FormatConfig;
use crate::error::{ChainError, Result};
use crate::transaction::Transaction;
use std::fmt;
use std::io::{BufRead, Split, Write};
use tracing::{debug, warn};

pub const PLAIN_HEADER: &str = "BlockChain info:";
pub const HASHED_HEADER: &str = "BlockChain Dump:";

const SENDER_LABEL: &str = "Sender Name:";
const RECEIVER_LABEL: &str = "Receiver Name:";
const VALUE_LABEL: &str = "Transaction Value:";
const TIMESTAMP_LABEL: &str = "Transaction Timestamp:";

impl BlockChain {
    /// Reads a plain dump with the default format options.
    pub fn load<R: BufRead>(reader: R) -> Result<BlockChain> {
        Self::load_with(reader, &FormatConfig::default())
    }

    /// Reads a plain dump. The first malformed record fails the whole load.
    pub fn load_with<R: BufRead>(reader: R, format: &FormatConfig) -> Result<BlockChain> {
        let mut lines = RecordLines::new(reader);
        let mut chain = BlockChain::new();

        match lines.next_line()? {
            Some((_, line)) if line == PLAIN_HEADER => {}
            Some((number, _)) if format.require_header => {
                return Err(ChainError::malformed(
                    number,
                    format!("expected header {:?}", PLAIN_HEADER),
                ));
            }
            Some(entry) => lines.push_back(entry),
            None if format.require_header => {
                return Err(ChainError::malformed(0, "input is empty"));
            }
            None => return Ok(chain),
        }

        while let Some((number, line)) = lines.next_line()? {
            let ordinal = chain.len() + 1;
            if parse_ordinal(&line) != Some(ordinal) {
                return Err(ChainError::malformed(
                    number,
                    format!("expected record number \"{}.\", found {:?}", ordinal, line),
                ));
            }

            let (sender_line, sender) = lines.expect_field(SENDER_LABEL)?;
            let (_, receiver) = lines.expect_field(RECEIVER_LABEL)?;
            let (value_line, value) = lines.expect_field(VALUE_LABEL)?;
            let (_, timestamp) = lines.expect_field(TIMESTAMP_LABEL)?;

            let value: u32 = value.parse().map_err(|_| {
                ChainError::malformed(value_line, format!("invalid transaction value {:?}", value))
            })?;

            let transaction = Transaction::new(value, sender, receiver);
            transaction
                .validate()
                .map_err(|e| ChainError::malformed(sender_line, e.to_string()))?;
            chain.append(transaction, timestamp);
        }

        debug!("Loaded {} blocks", chain.len());
        Ok(chain)
    }

    /// Writes the plain, numbered record dump.
    ///
    /// Every block is checked first, so a chain holding an empty name or a
    /// field with a line break is refused with `InvalidTransaction` before
    /// anything is written: such a dump could not be loaded back.
    pub fn dump<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (index, block) in self.iter().enumerate() {
            block.validate().map_err(|e| {
                ChainError::InvalidTransaction(format!("block {}: {}", index + 1, e))
            })?;
        }

        writeln!(writer, "{}", PLAIN_HEADER)?;
        for (index, block) in self.iter().enumerate() {
            writeln!(writer, "{}.", index + 1)?;
            block.transaction.dump_info(writer)?;
            writeln!(writer, "{} {}", TIMESTAMP_LABEL, block.timestamp)?;
        }
        Ok(())
    }

    /// Writes one numbered fingerprint line per block.
    pub fn dump_hashed<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", HASHED_HEADER)?;
        for (index, block) in self.iter().enumerate() {
            writeln!(writer, "{}. {}", index + 1, block.transaction.hashed_message())?;
        }
        Ok(())
    }

    /// Checks a stored fingerprint list against this chain.
    ///
    /// Lines are bare fingerprints, or the exact output of
    /// [`BlockChain::dump_hashed`]. Empty lines are ignored. Any mismatch,
    /// including bytes that are not UTF-8, yields `Ok(false)`; `Err` is
    /// reserved for read failures.
    pub fn verify_file<R: BufRead>(&self, reader: R) -> Result<bool> {
        let mut fingerprints: Vec<String> = Vec::new();
        let mut header_seen = false;

        for (index, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes?;
            let Ok(line) = String::from_utf8(bytes) else {
                warn!("Fingerprint file line {} is not valid UTF-8", index + 1);
                return Ok(false);
            };
            let line = trim_line_end(&line);
            if line.is_empty() {
                continue;
            }
            if fingerprints.is_empty() && !header_seen && line == HASHED_HEADER {
                header_seen = true;
                continue;
            }
            let position = fingerprints.len() + 1;
            fingerprints.push(strip_ordinal(line, position).to_string());
        }

        debug!(
            "Verifying {} fingerprints against {} blocks",
            fingerprints.len(),
            self.len()
        );
        Ok(self.verify_fingerprints(&fingerprints))
    }
}

impl fmt::Display for BlockChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", PLAIN_HEADER)?;
        for (index, block) in self.iter().enumerate() {
            writeln!(f, "{}.", index + 1)?;
            writeln!(f, "{}", block.transaction)?;
            writeln!(f, "{} {}", TIMESTAMP_LABEL, block.timestamp)?;
        }
        Ok(())
    }
}

/// Non-empty input lines with their 1-based line numbers.
struct RecordLines<R> {
    lines: Split<R>,
    line_number: usize,
    pending: Option<(usize, String)>,
}

impl<R: BufRead> RecordLines<R> {
    fn new(reader: R) -> Self {
        RecordLines {
            lines: reader.split(b'\n'),
            line_number: 0,
            pending: None,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        if let Some(entry) = self.pending.take() {
            return Ok(Some(entry));
        }
        for bytes in self.lines.by_ref() {
            let bytes = bytes?;
            self.line_number += 1;
            let number = self.line_number;
            let line = String::from_utf8(bytes)
                .map_err(|_| ChainError::malformed(number, "line is not valid UTF-8"))?;
            let trimmed = trim_line_end(&line);
            if !trimmed.is_empty() {
                return Ok(Some((number, trimmed.to_string())));
            }
        }
        Ok(None)
    }

    fn push_back(&mut self, entry: (usize, String)) {
        self.pending = Some(entry);
    }

    /// Reads the next line and returns the text after `label`.
    fn expect_field(&mut self, label: &str) -> Result<(usize, String)> {
        let (number, line) = self.next_line()?.ok_or_else(|| {
            ChainError::malformed(
                self.line_number,
                format!("unexpected end of input, expected {:?}", label),
            )
        })?;
        let rest = line.strip_prefix(label).ok_or_else(|| {
            ChainError::malformed(number, format!("expected {:?}, found {:?}", label, line))
        })?;
        let value = rest.strip_prefix(' ').unwrap_or(rest);
        Ok((number, value.to_string()))
    }
}

fn trim_line_end(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_ordinal(line: &str) -> Option<usize> {
    line.strip_suffix('.')?.parse().ok()
}

/// Removes a `"<position>. "` prefix. A prefix carrying another number is
/// left in place so the comparison fails.
fn strip_ordinal(line: &str, position: usize) -> &str {
    match line.split_once(". ") {
        Some((number, rest)) if number.parse::<usize>() == Ok(position) => rest,
        _ => line,
    }
}
