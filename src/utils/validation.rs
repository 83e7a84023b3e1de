//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is zero or positive
pub fn validate_non_negative_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(LedgerError::InvalidAmount(format!(
            "amount must not be negative, got {}",
            amount
        )))
    } else {
        Ok(())
    }
}

/// Validate that an account holder name is valid
pub fn validate_account_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a transaction name is valid
pub fn validate_transaction_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Transaction name cannot be empty".to_string(),
        ));
    }

    if name.len() > 200 {
        return Err(LedgerError::Validation(
            "Transaction name cannot exceed 200 characters".to_string(),
        ));
    }

    Ok(())
}

/// Stricter validator that also checks the transaction name
pub struct EnhancedTransactionValidator;

impl TransactionValidator for EnhancedTransactionValidator {
    fn validate_draft(&self, draft: &TransactionDraft) -> LedgerResult<()> {
        validate_non_negative_amount(&draft.amount)?;
        validate_transaction_name(&draft.name)?;
        Ok(())
    }
}
