//! HashLedger - an append-only ledger of transfers kept as a chain of blocks
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the chain, compression and balances
//! - [`transaction`] - Transaction type, fingerprints and validation
//! - [`checksum`] - Keyed checksum behind every fingerprint
//!
//! ## Persistence
//! - [`persistence`] - Plain and hashed text dumps, loading and verification
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Command-line front end
//!
//! # Example
//!
//! ```
//! use hashledger::blockchain::BlockChain;
//!
//! let mut chain = BlockChain::new();
//! chain.append_transaction(10, "Alice", "Bob", "t1");
//! chain.append_transaction(5, "Bob", "Alice", "t2");
//! assert_eq!(chain.personal_balance("Bob"), 5);
//!
//! let mut hashed = Vec::new();
//! chain.dump_hashed(&mut hashed).unwrap();
//! assert!(chain.verify_file(hashed.as_slice()).unwrap());
//! ```

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod checksum;
pub mod transaction;

// ============================================================================
// Persistence
// ============================================================================
pub mod persistence;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
