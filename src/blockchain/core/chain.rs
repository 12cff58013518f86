use crate::error::ChainError;
use crate::transaction::Transaction;
use tracing::debug;
use std::slice;

/// A single ledger entry: one transaction and the caller-supplied timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub transaction: Transaction,
    pub timestamp: String,
}

impl Block {
    pub fn new(transaction: Transaction, timestamp: impl Into<String>) -> Self {
        Block {
            transaction,
            timestamp: timestamp.into(),
        }
    }
}

/// Append-only sequence of blocks, oldest first.
///
/// The chain owns every block. Index `0` is the head (oldest entry) and
/// `len() - 1` the tail (newest entry); all traversals run head to tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockChain {
    blocks: Vec<Block>,
}

impl BlockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks in the chain.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Oldest block.
    pub fn head(&self) -> Option<&Block> {
        self.blocks.first()
    }

    /// Newest block.
    pub fn tail(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// The block appended just before the one at `index`.
    pub fn previous(&self, index: usize) -> Option<&Block> {
        index.checked_sub(1).and_then(|prev| self.blocks.get(prev))
    }

    /// Builds a transaction from raw fields and appends it as the new tail.
    ///
    /// Fields are not checked here. A chain holding an empty name or a line
    /// break in any field can still be hashed, but [`BlockChain::dump`]
    /// refuses it; see [`Block::validate`].
    pub fn append_transaction(
        &mut self,
        value: u32,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        timestamp: impl Into<String>,
    ) {
        self.append(Transaction::new(value, sender, receiver), timestamp);
    }

    /// Appends a copy of `transaction` as the new tail.
    pub fn append_copy(&mut self, transaction: &Transaction, timestamp: impl Into<String>) {
        self.append(transaction.clone(), timestamp);
    }

    pub(crate) fn append(&mut self, transaction: Transaction, timestamp: impl Into<String>) {
        self.blocks.push(Block::new(transaction, timestamp));
    }

    /// Replaces every value with `function(value)`, head to tail.
    pub fn transform<F>(&mut self, mut function: F)
    where
        F: FnMut(u32) -> u32,
    {
        for block in &mut self.blocks {
            block.transaction.value = function(block.transaction.value);
        }
    }

    /// Merges every run of adjacent blocks with the same sender and receiver
    /// into one block carrying the run's total value and its first timestamp.
    ///
    /// Fails with `ValueOverflow` if a merged total does not fit in a `u32`;
    /// the chain is left unchanged in that case.
    pub fn compress(&mut self) -> Result<(), ChainError> {
        let mut merged: Vec<Block> = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match merged.last_mut() {
                Some(last) if last.transaction.same_parties(&block.transaction) => {
                    last.transaction.value = last
                        .transaction
                        .value
                        .checked_add(block.transaction.value)
                        .ok_or(ChainError::ValueOverflow)?;
                }
                _ => merged.push(block.clone()),
            }
        }

        debug!(
            "Compressed chain from {} to {} blocks",
            self.blocks.len(),
            merged.len()
        );
        self.blocks = merged;
        Ok(())
    }

    /// Drops every block. Calling this on an empty chain does nothing.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

impl<'a> IntoIterator for &'a BlockChain {
    type Item = &'a Block;
    type IntoIter = slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chain() -> BlockChain {
        let mut chain = BlockChain::new();
        chain.append_transaction(10, "Alice", "Bob", "t1");
        chain.append_transaction(5, "Bob", "Alice", "t2");
        chain.append_transaction(10, "Alice", "Bob", "t3");
        chain
    }

    #[test]
    fn test_append_grows_at_tail() {
        let chain = sample_chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.head().unwrap().timestamp, "t1");
        assert_eq!(chain.tail().unwrap().timestamp, "t3");
        assert_eq!(chain.get(1).unwrap().transaction.sender, "Bob");
    }

    #[test]
    fn test_append_copy() {
        let mut chain = BlockChain::new();
        let tx = Transaction::new(7, "Carol", "Dave");
        chain.append_copy(&tx, "noon");
        chain.append_copy(&tx, "midnight");

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get(0).unwrap().transaction, tx);
        assert_eq!(chain.get(1).unwrap().timestamp, "midnight");
    }

    #[test]
    fn test_previous_link() {
        let chain = sample_chain();
        assert!(chain.previous(0).is_none());
        assert_eq!(chain.previous(1).unwrap().timestamp, "t1");
        assert_eq!(chain.previous(2).unwrap().timestamp, "t2");
        assert!(chain.previous(10).is_none());
    }

    #[test]
    fn test_transform_in_place() {
        let mut chain = sample_chain();
        chain.transform(|value| value * 2);
        let values: Vec<u32> = chain.iter().map(|b| b.transaction.value).collect();
        assert_eq!(values, vec![20, 10, 20]);
    }

    #[test]
    fn test_transform_visits_in_chain_order() {
        let mut chain = sample_chain();
        let mut seen = Vec::new();
        chain.transform(|value| {
            seen.push(value);
            value
        });
        assert_eq!(seen, vec![10, 5, 10]);
    }

    #[test]
    fn test_compress_keeps_non_adjacent_blocks() {
        let mut chain = sample_chain();
        chain.compress().unwrap();
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_compress_merges_adjacent_run() {
        let mut chain = BlockChain::new();
        chain.append_transaction(1, "A", "B", "t1");
        chain.append_transaction(2, "A", "B", "t2");
        chain.compress().unwrap();

        assert_eq!(chain.len(), 1);
        let block = chain.head().unwrap();
        assert_eq!(block.transaction.value, 3);
        assert_eq!(block.timestamp, "t1");
    }

    #[test]
    fn test_compress_multiple_runs() {
        let mut chain = BlockChain::new();
        chain.append_transaction(1, "A", "B", "t1");
        chain.append_transaction(2, "A", "B", "t2");
        chain.append_transaction(3, "B", "A", "t3");
        chain.append_transaction(4, "A", "B", "t4");
        chain.append_transaction(5, "A", "B", "t5");
        chain.append_transaction(6, "A", "B", "t6");
        chain.compress().unwrap();

        let summary: Vec<(u32, &str)> = chain
            .iter()
            .map(|b| (b.transaction.value, b.timestamp.as_str()))
            .collect();
        assert_eq!(summary, vec![(3, "t1"), (3, "t3"), (15, "t4")]);
    }

    #[test]
    fn test_compress_is_idempotent() {
        let mut chain = BlockChain::new();
        chain.append_transaction(1, "A", "B", "t1");
        chain.append_transaction(2, "A", "B", "t2");
        chain.append_transaction(3, "A", "C", "t3");
        chain.compress().unwrap();
        let once = chain.clone();
        chain.compress().unwrap();
        assert_eq!(chain, once);
    }

    #[test]
    fn test_compress_overflow_leaves_chain_untouched() {
        let mut chain = BlockChain::new();
        chain.append_transaction(u32::MAX, "A", "B", "t1");
        chain.append_transaction(1, "A", "B", "t2");
        let before = chain.clone();

        assert_eq!(chain.compress(), Err(ChainError::ValueOverflow));
        assert_eq!(chain, before);
    }

    #[test]
    fn test_compress_empty_chain() {
        let mut chain = BlockChain::new();
        chain.compress().unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_clear_is_repeatable() {
        let mut chain = sample_chain();
        chain.clear();
        assert_eq!(chain.len(), 0);
        chain.clear();
        assert!(chain.is_empty());
    }
}
