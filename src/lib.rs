//! # Pocket Ledger
//!
//! Bookkeeping for a personal account: a running balance, cumulative
//! income and expense totals, and the transactions behind them.
//!
//! ## Features
//!
//! - **Pure mutation engine**: record, amend and remove transactions on an
//!   [`Account`] snapshot while keeping balance, totals and the
//!   `transactions`/`expenses`/`income` collections consistent
//! - **Storage abstraction**: any backend implementing [`AccountStore`]
//! - **Optimistic concurrency**: version-checked writes with bounded retry
//!   in the [`Ledger`] service
//!
//! ## Quick Start
//!
//! ```rust
//! use pocket_ledger::{record_transaction, Account, TransactionDraft};
//! use bigdecimal::BigDecimal;
//! use chrono::Utc;
//!
//! let account = Account::new("acc-1".to_string(), "Jane".to_string());
//! let draft = TransactionDraft::paid(Utc::now(), "Coffee".to_string(), BigDecimal::from(4));
//! let account = record_transaction(&account, draft).unwrap();
//! assert_eq!(account.balance, BigDecimal::from(-4));
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::LedgerConfig;
pub use ledger::*;
pub use traits::*;
pub use types::*;
