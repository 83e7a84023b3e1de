//! Ledger module containing the mutation engine and the service that persists its results

pub mod account;
pub mod core;
pub mod engine;

pub use self::core::*;
pub use engine::{amend_transaction, record_transaction, remove_transaction};
