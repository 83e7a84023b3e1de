//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory account store with version-checked writes
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> LedgerResult<usize> {
        Ok(self.accounts.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        self.accounts.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Storage("lock poisoned".to_string())
}

#[async_trait]
impl AccountStore for MemoryStorage {
    async fn insert_account(&self, account: &Account) -> LedgerResult<()> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        if accounts.contains_key(&account.id) {
            return Err(LedgerError::Validation(format!(
                "Account with ID '{}' already exists",
                account.id
            )));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn load_account(&self, account_id: &str) -> LedgerResult<Account> {
        self.accounts
            .read()
            .map_err(poisoned)?
            .get(account_id)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))
    }

    async fn store_account(&self, account: &Account) -> LedgerResult<Account> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        let current = accounts
            .get(&account.id)
            .ok_or_else(|| LedgerError::AccountNotFound(account.id.clone()))?;

        if current.version != account.version {
            return Err(LedgerError::ConcurrentModification {
                account_id: account.id.clone(),
                attempts: 1,
            });
        }

        let mut stored = account.clone();
        stored.version += 1;
        accounts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }
}
