//! Basic ledger usage example

use bigdecimal::BigDecimal;
use chrono::{TimeZone, Utc};
use pocket_ledger::utils::MemoryStorage;
use pocket_ledger::{Ledger, LedgerConfig, TransactionDraft};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    println!("Pocket Ledger - Basic Example\n");

    let config = LedgerConfig {
        max_attempts: 5,
        retry_backoff_ms: 10,
        ..LedgerConfig::default()
    };
    let ledger = Ledger::with_config(MemoryStorage::new(), config);

    let account = ledger.create_account("Jane Doe".to_string()).await?;
    println!("Created account {} for {}\n", account.id, account.name);

    let day = |d: u32| Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).single();

    let account = ledger
        .record_transaction(
            &account.id,
            TransactionDraft::received(
                day(1).ok_or("invalid date")?,
                "Salary".to_string(),
                BigDecimal::from(3200),
            ),
        )
        .await?;
    println!("  Recorded salary, balance = {}", account.balance);

    let account = ledger
        .record_transaction(
            &account.id,
            TransactionDraft::paid(
                day(3).ok_or("invalid date")?,
                "Rent".to_string(),
                BigDecimal::from(1100),
            ),
        )
        .await?;
    println!("  Recorded rent, balance = {}", account.balance);

    // Status arriving as text from a form or API payload
    let groceries = TransactionDraft::parse(
        day(4).ok_or("invalid date")?,
        "Groceries".to_string(),
        "86.40".parse()?,
        "paid",
    )?;
    let account = ledger.record_transaction(&account.id, groceries).await?;
    println!("  Recorded groceries, balance = {}", account.balance);

    // The rent was actually a refund owed to us
    let rent_id = account.transactions[1].id.clone();
    let account = ledger
        .amend_transaction(
            &account.id,
            &rent_id,
            TransactionDraft::received(
                day(3).ok_or("invalid date")?,
                "Deposit refund".to_string(),
                BigDecimal::from(400),
            ),
        )
        .await?;
    println!("  Reclassified rent as refund, balance = {}", account.balance);

    let groceries_id = account.transactions[2].id.clone();
    let account = ledger.remove_transaction(&account.id, &groceries_id).await?;
    println!("  Removed groceries, balance = {}\n", account.balance);

    if let Err(err) = TransactionDraft::parse(
        Utc::now(),
        "Unknown".to_string(),
        BigDecimal::from(1),
        "pending",
    ) {
        println!("  Rejected draft: {}\n", err);
    }

    let summary = account.summary();
    println!("Summary for {}", summary.name);
    println!("  Balance:        {}", summary.balance);
    println!("  Total income:   {}", summary.total_income);
    println!("  Total expense:  {}", summary.total_expense);
    println!(
        "  Entries:        {} ({} income, {} expenses)",
        summary.transaction_count, summary.income_count, summary.expense_count
    );
    println!("  Version:        {}", account.version);

    account.check_invariants()?;
    Ok(())
}
