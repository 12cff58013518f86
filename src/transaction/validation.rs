//! Validation logic for transactions separated from type definitions
use crate::error::ChainError;
use crate::transaction::types::Transaction;

impl Transaction {
    /// Checks that both names are non-empty single-line strings.
    ///
    /// A name containing a line break could not be read back from a dump.
    pub fn validate(&self) -> Result<(), ChainError> {
        validate_name("Sender", &self.sender)?;
        validate_name("Receiver", &self.receiver)
    }
}

fn validate_name(role: &str, name: &str) -> Result<(), ChainError> {
    if name.is_empty() {
        return Err(ChainError::InvalidTransaction(format!(
            "{} name cannot be empty",
            role
        )));
    }
    if name.contains(|c: char| c == '\n' || c == '\r') {
        return Err(ChainError::InvalidTransaction(format!(
            "{} name cannot contain line breaks: {:?}",
            role, name
        )));
    }
    Ok(())
}
