//! Transaction types for HashLedger
use crate::checksum::keyed_checksum;
use std::fmt;
use std::io::{self, Write};

/// A transfer of `value` from `sender` to `receiver`.
///
/// Two transactions with equal fields are interchangeable; there is no
/// separate identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    pub value: u32,
    pub sender: String,
    pub receiver: String,
}

impl Transaction {
    pub fn new(value: u32, sender: impl Into<String>, receiver: impl Into<String>) -> Self {
        Transaction {
            value,
            sender: sender.into(),
            receiver: receiver.into(),
        }
    }

    /// Writes the sender, receiver and value lines of this transaction.
    pub fn dump_info<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self)
    }

    /// Fingerprint of this transaction, keyed by its value.
    pub fn hashed_message(&self) -> String {
        keyed_checksum(self.value, &self.sender, &self.receiver)
    }

    /// Returns true iff `candidate` is exactly this transaction's fingerprint.
    pub fn verify_hashed_message(&self, candidate: &str) -> bool {
        self.hashed_message() == candidate
    }

    /// Same sender and same receiver. Value is not compared.
    pub fn same_parties(&self, other: &Transaction) -> bool {
        self.sender == other.sender && self.receiver == other.receiver
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sender Name: {}", self.sender)?;
        writeln!(f, "Receiver Name: {}", self.receiver)?;
        write!(f, "Transaction Value: {}", self.value)
    }
}
