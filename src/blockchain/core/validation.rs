use crate::blockchain::core::chain::{Block, BlockChain};
use crate::error::ChainError;
use tracing::warn;

impl Block {
    /// Checks that the block can be written as a plain record and read
    /// back unchanged: valid names and a single-line timestamp.
    pub fn validate(&self) -> Result<(), ChainError> {
        self.transaction.validate()?;
        if self.timestamp.contains(|c: char| c == '\n' || c == '\r') {
            return Err(ChainError::InvalidTransaction(format!(
                "Timestamp cannot contain line breaks: {:?}",
                self.timestamp
            )));
        }
        Ok(())
    }
}

impl BlockChain {
    /// True when no two adjacent blocks share both sender and receiver.
    pub fn is_compressed(&self) -> bool {
        self.blocks()
            .windows(2)
            .all(|pair| !pair[0].transaction.same_parties(&pair[1].transaction))
    }

    /// Checks `fingerprints` against the chain, position by position.
    ///
    /// All or nothing: the count must equal `len()` and every entry must be
    /// the fingerprint of the block at the same position.
    pub fn verify_fingerprints<I, S>(&self, fingerprints: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut checked = 0;
        for fingerprint in fingerprints {
            let Some(block) = self.get(checked) else {
                warn!("Fingerprint list is longer than the chain ({} blocks)", self.len());
                return false;
            };
            if !block.transaction.verify_hashed_message(fingerprint.as_ref()) {
                warn!("Fingerprint mismatch at position {}", checked + 1);
                return false;
            }
            checked += 1;
        }

        if checked != self.len() {
            warn!(
                "Fingerprint list has {} entries but the chain has {} blocks",
                checked,
                self.len()
            );
            return false;
        }
        true
    }
}
