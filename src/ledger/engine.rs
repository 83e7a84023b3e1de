//! Pure state transitions on an account snapshot
//!
//! Every function here takes the current [`Account`] by reference and returns
//! a new snapshot. The input is never modified, so a failed call leaves the
//! caller's copy exactly as it was. Nothing in this module touches storage.

use tracing::trace;
use uuid::Uuid;

use crate::types::*;
use crate::utils::validation::validate_non_negative_amount;

/// Record a new transaction, assigning it a fresh id
///
/// The new transaction is appended to `transactions` and to the
/// sub-collection matching its status.
pub fn record_transaction(account: &Account, draft: TransactionDraft) -> LedgerResult<Account> {
    validate_non_negative_amount(&draft.amount)?;

    let transaction = Transaction::from_draft(Uuid::new_v4().to_string(), draft);
    let mut next = account.clone();

    next.apply_contribution(transaction.status, &transaction.amount);
    next.bucket_mut(transaction.status).push(transaction.clone());
    next.transactions.push(transaction);
    next.touch();

    trace!(account_id = %next.id, balance = %next.balance, "transaction recorded");
    Ok(next)
}

/// Amend an existing transaction's date, name, amount and status
///
/// The id is preserved and every collection entry is replaced in place. A
/// status change moves the transaction from its old sub-collection to the
/// end of the new one.
pub fn amend_transaction(
    account: &Account,
    transaction_id: &str,
    patch: TransactionDraft,
) -> LedgerResult<Account> {
    let position = account
        .position_of(transaction_id)
        .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id.to_string()))?;
    validate_non_negative_amount(&patch.amount)?;

    let mut next = account.clone();
    let old = next.transactions[position].clone();
    let amended = Transaction::from_draft(old.id.clone(), patch);

    if old.status == amended.status {
        let delta = &amended.amount - &old.amount;
        next.apply_contribution(amended.status, &delta);

        let bucket = next.bucket_mut(amended.status);
        let slot = bucket
            .iter_mut()
            .find(|t| t.id == old.id)
            .ok_or_else(|| missing_from_bucket(&old))?;
        *slot = amended.clone();
    } else {
        next.reverse_contribution(old.status, &old.amount);
        next.apply_contribution(amended.status, &amended.amount);

        let from = next.bucket_mut(old.status);
        let index = from
            .iter()
            .position(|t| t.id == old.id)
            .ok_or_else(|| missing_from_bucket(&old))?;
        from.remove(index);
        next.bucket_mut(amended.status).push(amended.clone());
    }

    next.transactions[position] = amended;
    next.touch();

    trace!(
        account_id = %next.id,
        transaction_id,
        balance = %next.balance,
        "transaction amended"
    );
    Ok(next)
}

/// Remove a transaction and reverse its contribution to the totals
pub fn remove_transaction(account: &Account, transaction_id: &str) -> LedgerResult<Account> {
    let position = account
        .position_of(transaction_id)
        .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id.to_string()))?;

    let mut next = account.clone();
    let removed = next.transactions.remove(position);
    next.reverse_contribution(removed.status, &removed.amount);

    let bucket = next.bucket_mut(removed.status);
    let index = bucket
        .iter()
        .position(|t| t.id == removed.id)
        .ok_or_else(|| missing_from_bucket(&removed))?;
    bucket.remove(index);
    next.touch();

    trace!(
        account_id = %next.id,
        transaction_id,
        balance = %next.balance,
        "transaction removed"
    );
    Ok(next)
}

fn missing_from_bucket(transaction: &Transaction) -> LedgerError {
    LedgerError::InvariantViolation(format!(
        "transaction '{}' is missing from the {} collection",
        transaction.id, transaction.status
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};

    fn account() -> Account {
        Account::new("acc".to_string(), "Jane".to_string())
    }

    fn draft(amount: i64, status: TransactionStatus) -> TransactionDraft {
        TransactionDraft::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            "groceries".to_string(),
            BigDecimal::from(amount),
            status,
        )
    }

    fn last_id(account: &Account) -> String {
        account.transactions.last().unwrap().id.clone()
    }

    #[test]
    fn test_record_paid() {
        let before = account();
        let after = record_transaction(&before, draft(50, TransactionStatus::Paid)).unwrap();

        assert_eq!(after.balance, BigDecimal::from(-50));
        assert_eq!(after.total_expense, BigDecimal::from(50));
        assert_eq!(after.transactions.len(), 1);
        assert_eq!(after.expenses.len(), 1);
        assert!(after.income.is_empty());
        assert!(after.check_invariants().is_ok());

        // input snapshot untouched
        assert!(before.transactions.is_empty());
    }

    #[test]
    fn test_record_assigns_unique_ids() {
        let a = record_transaction(&account(), draft(1, TransactionStatus::Paid)).unwrap();
        let b = record_transaction(&a, draft(1, TransactionStatus::Paid)).unwrap();
        assert_ne!(b.transactions[0].id, b.transactions[1].id);
    }

    #[test]
    fn test_record_rejects_negative_amount() {
        let before = account();
        let snapshot = before.clone();
        let err = record_transaction(&before, draft(-5, TransactionStatus::Received)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_amend_rejects_negative_amount() {
        let acc = record_transaction(&account(), draft(5, TransactionStatus::Paid)).unwrap();
        let snapshot = acc.clone();
        let id = last_id(&acc);

        let mut patch = TransactionDraft::from(acc.find_transaction(&id).unwrap().clone());
        patch.amount = BigDecimal::from(-1);
        patch.status = TransactionStatus::Received;

        let err = amend_transaction(&acc, &id, patch).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(acc, snapshot);
    }

    #[test]
    fn test_amend_from_existing_transaction_renames_only() {
        let acc = record_transaction(&account(), draft(12, TransactionStatus::Paid)).unwrap();
        let id = last_id(&acc);

        let mut patch = TransactionDraft::from(acc.find_transaction(&id).unwrap().clone());
        patch.name = "market".to_string();
        let acc = amend_transaction(&acc, &id, patch).unwrap();

        let amended = acc.find_transaction(&id).unwrap();
        assert_eq!(amended.name, "market");
        assert_eq!(amended.amount, BigDecimal::from(12));
        assert_eq!(acc.balance, BigDecimal::from(-12));
        assert!(acc.find_transaction("missing").is_none());
    }

    #[test]
    fn test_amend_same_status_replaces_in_place() {
        let mut acc = account();
        acc = record_transaction(&acc, draft(10, TransactionStatus::Received)).unwrap();
        acc = record_transaction(&acc, draft(20, TransactionStatus::Received)).unwrap();
        let first = acc.transactions[0].id.clone();

        acc = amend_transaction(&acc, &first, draft(15, TransactionStatus::Received)).unwrap();
        acc = amend_transaction(&acc, &first, draft(40, TransactionStatus::Received)).unwrap();

        assert_eq!(acc.transactions.len(), 2);
        assert_eq!(acc.income.len(), 2);
        assert_eq!(acc.transactions[0].id, first);
        assert_eq!(acc.income[0].id, first);
        assert_eq!(acc.income[0].amount, BigDecimal::from(40));
        assert_eq!(acc.total_income, BigDecimal::from(60));
        assert_eq!(acc.balance, BigDecimal::from(60));
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_amend_status_change_moves_between_collections() {
        let mut acc = account();
        acc = record_transaction(&acc, draft(100, TransactionStatus::Received)).unwrap();
        let id = last_id(&acc);

        acc = amend_transaction(&acc, &id, draft(30, TransactionStatus::Paid)).unwrap();

        assert!(acc.income.is_empty());
        assert_eq!(acc.expenses.len(), 1);
        assert_eq!(acc.expenses[0].id, id);
        assert_eq!(acc.transactions.len(), 1);
        assert_eq!(acc.transactions[0].status, TransactionStatus::Paid);
        assert_eq!(acc.total_income, BigDecimal::from(0));
        assert_eq!(acc.total_expense, BigDecimal::from(30));
        assert_eq!(acc.balance, BigDecimal::from(-30));
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_amend_keeps_transaction_order() {
        let mut acc = account();
        for amount in [1, 2, 3] {
            acc = record_transaction(&acc, draft(amount, TransactionStatus::Paid)).unwrap();
        }
        let middle = acc.transactions[1].id.clone();
        let ids: Vec<String> = acc.transactions.iter().map(|t| t.id.clone()).collect();

        acc = amend_transaction(&acc, &middle, draft(9, TransactionStatus::Received)).unwrap();

        let after: Vec<String> = acc.transactions.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, after);
        assert_eq!(acc.transactions[1].amount, BigDecimal::from(9));
    }

    #[test]
    fn test_amend_unknown_id() {
        let acc = record_transaction(&account(), draft(5, TransactionStatus::Paid)).unwrap();
        let err = amend_transaction(&acc, "missing", draft(5, TransactionStatus::Paid)).unwrap_err();
        assert_eq!(err, LedgerError::TransactionNotFound("missing".to_string()));
    }

    #[test]
    fn test_remove_only_drops_matching_id() {
        let mut acc = account();
        acc = record_transaction(&acc, draft(25, TransactionStatus::Paid)).unwrap();
        acc = record_transaction(&acc, draft(25, TransactionStatus::Paid)).unwrap();
        let first = acc.transactions[0].id.clone();
        let second = acc.transactions[1].id.clone();

        acc = remove_transaction(&acc, &first).unwrap();

        assert_eq!(acc.transactions.len(), 1);
        assert_eq!(acc.expenses.len(), 1);
        assert_eq!(acc.transactions[0].id, second);
        assert_eq!(acc.total_expense, BigDecimal::from(25));
        assert!(acc.check_invariants().is_ok());
    }

    #[test]
    fn test_remove_unknown_id() {
        let err = remove_transaction(&account(), "nope").unwrap_err();
        assert_eq!(err, LedgerError::TransactionNotFound("nope".to_string()));
    }
}
