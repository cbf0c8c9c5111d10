//! # Wallet Ledger
//!
//! Multi-currency wallet updates on top of a key-value ledger. Each update
//! loads a user's wallet, computes the new balance for one currency, writes
//! the wallet back and appends an auditable transaction record.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Uses 4 decimal places via `rust_decimal`
//! - **Pure calculation**: Balance rules live in a function with no store access
//! - **Narrow collaborators**: The ledger is only seen through `StateStore` and `TransactionLog`
//! - **All or nothing**: Hosts stage each invocation and commit only on success
//!
//! ## Example
//!
//! ```
//! use wallet_ledger::{wallet, MemoryLedger};
//!
//! let mut ledger = MemoryLedger::new();
//! wallet::update_from_args(&mut ledger, &["deposit", "alice", "USD", "100"]).unwrap();
//! wallet::update_from_args(&mut ledger, &["withdrawal", "alice", "USD", "40"]).unwrap();
//!
//! let state = wallet::load_state(&ledger, "alice").unwrap();
//! assert_eq!(state.get("USD").to_string(), "60.0000");
//! ```

pub mod calculator;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod state;
pub mod transaction;
pub mod wallet;

pub use calculator::{calculate, is_bootstrap, Operation};
pub use decimal::Amount;
pub use engine::LedgerEngine;
pub use error::{AmountError, CommitError, Result, StoreError, WalletError};
pub use ledger::{MemoryLedger, Staged, StateStore, StoreResult, TransactionLog};
pub use state::WalletState;
pub use transaction::{RecordedTransaction, TransactionRecord, UpdateRequest};
