//! Account bookkeeping helpers: contributions, lookups and invariant checks

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::types::*;

impl Account {
    /// Create a new account with zero balance and no transactions
    pub fn new(id: String, name: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name,
            balance: BigDecimal::from(0),
            total_income: BigDecimal::from(0),
            total_expense: BigDecimal::from(0),
            transactions: Vec::new(),
            expenses: Vec::new(),
            income: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a transaction by id
    pub fn find_transaction(&self, transaction_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == transaction_id)
    }

    /// Position of a transaction in `transactions`
    pub(crate) fn position_of(&self, transaction_id: &str) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == transaction_id)
    }

    /// The sub-collection that holds transactions of the given status
    pub fn bucket(&self, status: TransactionStatus) -> &[Transaction] {
        match status {
            TransactionStatus::Paid => &self.expenses,
            TransactionStatus::Received => &self.income,
        }
    }

    pub(crate) fn bucket_mut(&mut self, status: TransactionStatus) -> &mut Vec<Transaction> {
        match status {
            TransactionStatus::Paid => &mut self.expenses,
            TransactionStatus::Received => &mut self.income,
        }
    }

    /// Add an amount to the totals and balance under the given status
    pub(crate) fn apply_contribution(&mut self, status: TransactionStatus, amount: &BigDecimal) {
        match status {
            TransactionStatus::Paid => {
                self.total_expense += amount;
                self.balance -= amount;
            }
            TransactionStatus::Received => {
                self.total_income += amount;
                self.balance += amount;
            }
        }
    }

    /// Undo a previously applied contribution
    pub(crate) fn reverse_contribution(&mut self, status: TransactionStatus, amount: &BigDecimal) {
        match status {
            TransactionStatus::Paid => {
                self.total_expense -= amount;
                self.balance += amount;
            }
            TransactionStatus::Received => {
                self.total_income -= amount;
                self.balance -= amount;
            }
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    /// Verify that balance, totals and the three collections agree
    pub fn check_invariants(&self) -> LedgerResult<()> {
        let mut seen = HashSet::with_capacity(self.transactions.len());
        for transaction in &self.transactions {
            if !seen.insert(transaction.id.as_str()) {
                return Err(LedgerError::InvariantViolation(format!(
                    "transaction '{}' appears more than once",
                    transaction.id
                )));
            }
        }

        for status in [TransactionStatus::Paid, TransactionStatus::Received] {
            let expected: Vec<&Transaction> = self
                .transactions
                .iter()
                .filter(|t| t.status == status)
                .collect();
            let bucket = self.bucket(status);

            if bucket.len() != expected.len()
                || !expected
                    .iter()
                    .all(|t| bucket.iter().any(|b| b == *t))
            {
                return Err(LedgerError::InvariantViolation(format!(
                    "{} collection does not match the {} transactions",
                    match status {
                        TransactionStatus::Paid => "expenses",
                        TransactionStatus::Received => "income",
                    },
                    status
                )));
            }
        }

        let expense_sum: BigDecimal = self.expenses.iter().map(|t| &t.amount).sum();
        if expense_sum != self.total_expense {
            return Err(LedgerError::InvariantViolation(format!(
                "total expense {} does not match sum of expenses {}",
                self.total_expense, expense_sum
            )));
        }

        let income_sum: BigDecimal = self.income.iter().map(|t| &t.amount).sum();
        if income_sum != self.total_income {
            return Err(LedgerError::InvariantViolation(format!(
                "total income {} does not match sum of income {}",
                self.total_income, income_sum
            )));
        }

        let expected_balance = &self.total_income - &self.total_expense;
        if expected_balance != self.balance {
            return Err(LedgerError::InvariantViolation(format!(
                "balance {} does not equal income minus expense {}",
                self.balance, expected_balance
            )));
        }

        Ok(())
    }

    /// Headline figures for display
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            account_id: self.id.clone(),
            name: self.name.clone(),
            balance: self.balance.clone(),
            total_income: self.total_income.clone(),
            total_expense: self.total_expense.clone(),
            transaction_count: self.transactions.len(),
            expense_count: self.expenses.len(),
            income_count: self.income.len(),
        }
    }
}
