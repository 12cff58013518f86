use crate::blockchain::core::chain::BlockChain;
use crate::transaction::Transaction;
use std::collections::BTreeMap;

/// Net balance of every name that appears in a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    pub balances: BTreeMap<String, i64>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_transaction(&mut self, tx: &Transaction) {
        let value = i64::from(tx.value);
        *self.balances.entry(tx.sender.clone()).or_insert(0) -= value;
        *self.balances.entry(tx.receiver.clone()).or_insert(0) += value;
    }

    pub fn get_balance(&self, name: &str) -> i64 {
        self.balances.get(name).copied().unwrap_or(0)
    }

    /// Sum over all names. Zero for any chain, since every value leaves one
    /// name and enters another.
    pub fn total(&self) -> i64 {
        self.balances.values().sum()
    }
}

impl BlockChain {
    /// Value received minus value sent by `name`. Unknown names have 0.
    pub fn personal_balance(&self, name: &str) -> i64 {
        self.iter()
            .map(|block| balance_delta(&block.transaction, name))
            .sum()
    }

    pub fn balances(&self) -> BalanceSheet {
        let mut sheet = BalanceSheet::new();
        for block in self {
            sheet.apply_transaction(&block.transaction);
        }
        sheet
    }
}

fn balance_delta(tx: &Transaction, name: &str) -> i64 {
    let value = i64::from(tx.value);
    let mut delta = 0;
    if tx.sender == name {
        delta -= value;
    }
    if tx.receiver == name {
        delta += value;
    }
    delta
}
