//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;
use crate::utils::validation::validate_non_negative_amount;

/// Persistence gateway for account snapshots
///
/// Implementations store the whole [`Account`] document and guard writes
/// with its `version` token: `store_account` must only succeed when the
/// stored version still equals the snapshot's version, and must persist the
/// snapshot with the version incremented by one.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a freshly created account
    async fn insert_account(&self, account: &Account) -> LedgerResult<()>;

    /// Load the current snapshot of an account
    async fn load_account(&self, account_id: &str) -> LedgerResult<Account>;

    /// Write an updated snapshot back, returning it with its new version
    ///
    /// Fails with [`LedgerError::ConcurrentModification`] when another writer
    /// stored the account after this snapshot was loaded.
    async fn store_account(&self, account: &Account) -> LedgerResult<Account>;
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator: Send + Sync {
    /// Validate a draft before it is recorded or used as a patch
    fn validate_draft(&self, draft: &TransactionDraft) -> LedgerResult<()>;
}

/// Default validator: amounts must not be negative
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_draft(&self, draft: &TransactionDraft) -> LedgerResult<()> {
        validate_non_negative_amount(&draft.amount)
    }
}
