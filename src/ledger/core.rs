//! Ledger service: runs engine operations against a persistence gateway

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::ledger::engine;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_account_name;

/// Main ledger system that serializes mutations per account through
/// version-checked stores
pub struct Ledger<S: AccountStore> {
    storage: S,
    validator: Box<dyn TransactionValidator>,
    config: LedgerConfig,
}

impl<S: AccountStore> Ledger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, LedgerConfig::default())
    }

    /// Create a new ledger with custom retry settings
    pub fn with_config(storage: S, config: LedgerConfig) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultTransactionValidator),
            config,
        }
    }

    /// Replace the transaction validator
    pub fn with_validator(mut self, validator: Box<dyn TransactionValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Retry and verification settings in effect
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Create an empty account for a new holder
    #[instrument(skip(self))]
    pub async fn create_account(&self, name: String) -> LedgerResult<Account> {
        validate_account_name(&name)?;

        let account = Account::new(Uuid::new_v4().to_string(), name);
        self.storage.insert_account(&account).await?;

        info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Get an account by ID
    pub async fn get_account(&self, account_id: &str) -> LedgerResult<Account> {
        self.storage.load_account(account_id).await
    }

    /// Record a new transaction on an account
    #[instrument(skip(self, draft), fields(status = %draft.status))]
    pub async fn record_transaction(
        &self,
        account_id: &str,
        draft: TransactionDraft,
    ) -> LedgerResult<Account> {
        self.validator.validate_draft(&draft)?;
        self.mutate(account_id, "record", |account| {
            engine::record_transaction(account, draft.clone())
        })
        .await
    }

    /// Amend the fields of an existing transaction
    #[instrument(skip(self, patch), fields(status = %patch.status))]
    pub async fn amend_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
        patch: TransactionDraft,
    ) -> LedgerResult<Account> {
        self.validator.validate_draft(&patch)?;
        self.mutate(account_id, "amend", |account| {
            engine::amend_transaction(account, transaction_id, patch.clone())
        })
        .await
    }

    /// Remove a transaction from an account
    #[instrument(skip(self))]
    pub async fn remove_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> LedgerResult<Account> {
        self.mutate(account_id, "remove", |account| {
            engine::remove_transaction(account, transaction_id)
        })
        .await
    }

    /// Load, apply `mutation`, store; repeat the whole cycle on version conflicts
    async fn mutate<F>(
        &self,
        account_id: &str,
        operation: &str,
        mutation: F,
    ) -> LedgerResult<Account>
    where
        F: Fn(&Account) -> LedgerResult<Account> + Send + Sync,
    {
        let attempts = self.config.attempts();

        for attempt in 1..=attempts {
            debug!(account_id, operation, attempt, "loading account");
            let current = self.storage.load_account(account_id).await?;
            let next = mutation(&current)?;

            if self.config.verify_invariants {
                next.check_invariants()?;
            }

            match self.storage.store_account(&next).await {
                Ok(stored) => {
                    info!(
                        account_id,
                        operation,
                        version = stored.version,
                        balance = %stored.balance,
                        "ledger updated"
                    );
                    return Ok(stored);
                }
                Err(err) if err.is_retryable() => {
                    warn!(
                        account_id,
                        operation,
                        attempt,
                        "concurrent modification, retrying"
                    );
                    let backoff = self.config.retry_backoff();
                    if attempt < attempts && !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(LedgerError::ConcurrentModification {
            account_id: account_id.to_string(),
            attempts,
        })
    }
}
