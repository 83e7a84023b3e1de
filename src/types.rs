//! Core types and data structures for the ledger

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a transaction relative to the account holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Money left the account (counted in `total_expense`)
    Paid,
    /// Money came into the account (counted in `total_income`)
    Received,
}

impl TransactionStatus {
    /// Lowercase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "paid",
            TransactionStatus::Received => "received",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(TransactionStatus::Paid),
            "received" => Ok(TransactionStatus::Received),
            other => Err(LedgerError::InvalidStatus(other.to_string())),
        }
    }
}

/// A single dated ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned when the transaction is recorded
    pub id: String,
    /// When the transaction happened
    pub date: DateTime<Utc>,
    /// Free-form label
    pub name: String,
    /// Non-negative amount
    pub amount: BigDecimal,
    pub status: TransactionStatus,
}

impl Transaction {
    pub(crate) fn from_draft(id: String, draft: TransactionDraft) -> Self {
        Self {
            id,
            date: draft.date,
            name: draft.name,
            amount: draft.amount,
            status: draft.status,
        }
    }
}

/// Caller-supplied transaction fields, without an id
///
/// Serves as the draft for recording and as the patch for amending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: DateTime<Utc>,
    pub name: String,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
}

impl TransactionDraft {
    /// Create a new draft
    pub fn new(
        date: DateTime<Utc>,
        name: String,
        amount: BigDecimal,
        status: TransactionStatus,
    ) -> Self {
        Self {
            date,
            name,
            amount,
            status,
        }
    }

    /// Create a draft from an untyped status string, as received from a transport layer
    pub fn parse(
        date: DateTime<Utc>,
        name: String,
        amount: BigDecimal,
        status: &str,
    ) -> LedgerResult<Self> {
        Ok(Self::new(date, name, amount, status.parse()?))
    }

    /// Create a `Paid` draft
    pub fn paid(date: DateTime<Utc>, name: String, amount: BigDecimal) -> Self {
        Self::new(date, name, amount, TransactionStatus::Paid)
    }

    /// Create a `Received` draft
    pub fn received(date: DateTime<Utc>, name: String, amount: BigDecimal) -> Self {
        Self::new(date, name, amount, TransactionStatus::Received)
    }
}

impl From<Transaction> for TransactionDraft {
    fn from(transaction: Transaction) -> Self {
        Self {
            date: transaction.date,
            name: transaction.name,
            amount: transaction.amount,
            status: transaction.status,
        }
    }
}

/// Personal account holding a running balance and its transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: String,
    /// Account holder's display name
    pub name: String,
    /// `total_income - total_expense`
    pub balance: BigDecimal,
    pub total_income: BigDecimal,
    pub total_expense: BigDecimal,
    /// Every transaction, in insertion order
    pub transactions: Vec<Transaction>,
    /// Transactions with status `Paid`
    pub expenses: Vec<Transaction>,
    /// Transactions with status `Received`
    pub income: Vec<Transaction>,
    /// Optimistic concurrency token, bumped by the store on every write
    #[serde(default)]
    pub version: u64,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the account was last updated
    pub updated_at: NaiveDateTime,
}

/// Read-only overview of an account's figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: String,
    pub name: String,
    pub balance: BigDecimal,
    pub total_income: BigDecimal,
    pub total_expense: BigDecimal,
    pub transaction_count: usize,
    pub expense_count: usize,
    pub income_count: usize,
}

/// Errors that can occur in the ledger system
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid transaction status: {0}")]
    InvalidStatus(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Account {account_id} was modified concurrently (gave up after {attempts} attempts)")]
    ConcurrentModification { account_id: String, attempts: u32 },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl LedgerError {
    /// Whether re-running the whole load/mutate/store cycle may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::ConcurrentModification { .. })
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "paid".parse::<TransactionStatus>().unwrap(),
            TransactionStatus::Paid
        );
        assert_eq!(
            " Received ".parse::<TransactionStatus>().unwrap(),
            TransactionStatus::Received
        );
        assert_eq!(
            "pending".parse::<TransactionStatus>(),
            Err(LedgerError::InvalidStatus("pending".to_string()))
        );
    }

    #[test]
    fn test_status_serde_uses_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Received).unwrap();
        assert_eq!(json, "\"received\"");
        assert_eq!(json, format!("\"{}\"", TransactionStatus::Received.as_str()));

        let status: TransactionStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, TransactionStatus::Paid);

        assert!(serde_json::from_str::<TransactionStatus>("\"pending\"").is_err());
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        let conflict = LedgerError::ConcurrentModification {
            account_id: "acc".to_string(),
            attempts: 3,
        };
        assert!(conflict.is_retryable());
        assert!(!LedgerError::TransactionNotFound("t".to_string()).is_retryable());
        assert!(!LedgerError::Storage("down".to_string()).is_retryable());
    }
}
