//! Hospital bookkeeping walkthrough

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use hms_accounting::utils::MemoryStorage;
use hms_accounting::{
    AccountType, AccountingCore, JournalEntryBuilder, LedgerQuery, NewAccount, NewFinancialYear,
    TrialBalanceQuery,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hms_accounting=debug".into()),
        )
        .init();

    println!("🏥 HMS Accounting - Hospital Bookkeeping Example\n");

    let storage = MemoryStorage::new();
    let mut core = AccountingCore::new(storage);

    // 1. Open the fiscal year
    println!("📅 Opening Financial Year...");
    let fy = core
        .create_financial_year(
            NewFinancialYear::new(
                "FY 2024",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            )
            .current(),
        )
        .await?;
    println!("  ✓ {} ({} .. {})\n", fy.year_name, fy.start_date, fy.end_date);

    // 2. Set up a small chart of accounts
    println!("📊 Setting up Chart of Accounts...");
    let assets = core
        .create_account(NewAccount::new("1000", "Current Assets", AccountType::Asset))
        .await?;
    let cash = core
        .create_account(
            NewAccount::new("1100", "Cash", AccountType::Asset)
                .with_parent(assets.id)
                .with_opening_balance(BigDecimal::from(25000)),
        )
        .await?;
    let receivables = core
        .create_account(
            NewAccount::new("1200", "Patient Receivables", AccountType::Asset)
                .with_parent(assets.id),
        )
        .await?;
    let opd_revenue = core
        .create_account(NewAccount::new("4000", "OPD Revenue", AccountType::Revenue))
        .await?;
    let pharmacy_revenue = core
        .create_account(NewAccount::new("4100", "Pharmacy Revenue", AccountType::Revenue))
        .await?;
    let supplies = core
        .create_account(NewAccount::new("5000", "Medical Supplies", AccountType::Expense))
        .await?;

    for account in core.accounts(&Default::default()).await? {
        println!(
            "  ✓ {} - {} ({:?})",
            account.account_code, account.account_name, account.account_type
        );
    }
    println!();

    // 3. Post a day's activity
    println!("💰 Posting Journal Entries...\n");

    let consultations = JournalEntryBuilder::new(
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        "OPD consultations",
    )
    .debit(cash.id, BigDecimal::from(1800))
    .debit(receivables.id, BigDecimal::from(3200))
    .credit(opd_revenue.id, BigDecimal::from(5000))
    .build()?;
    let entry = core.post_journal_entry(consultations).await?;
    println!("  ✓ {} OPD consultations (₹5,000)", entry.entry_number);

    let pharmacy = JournalEntryBuilder::new(
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        "Pharmacy counter sales",
    )
    .debit(cash.id, BigDecimal::from(2400))
    .credit(pharmacy_revenue.id, BigDecimal::from(2400))
    .build()?;
    let entry = core.post_journal_entry(pharmacy).await?;
    println!("  ✓ {} Pharmacy sales (₹2,400)", entry.entry_number);

    let restock = JournalEntryBuilder::new(
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        "Ward supplies restock",
    )
    .reference("PO-1042", "PURCHASE_ORDER")
    .debit(supplies.id, BigDecimal::from(1750))
    .credit(cash.id, BigDecimal::from(1750))
    .build()?;
    let restock = core.post_journal_entry(restock).await?;
    println!("  ✓ {} Supplies restock (₹1,750)", restock.entry_number);

    // A mispost, corrected by reversal
    let reversal = core
        .reverse_entry(restock.id, "Duplicate purchase order")
        .await?;
    println!(
        "  ✓ {} Reversal of {} ({})",
        reversal.entry_number,
        restock.entry_number,
        reversal.description.as_deref().unwrap_or("")
    );

    // 4. Read the cash ledger
    println!("\n📒 Cash Ledger:");
    let page = core.ledger(&LedgerQuery::for_account(cash.id)).await?;
    for row in &page.rows {
        println!(
            "  {:<12} {:<24} dr {:>8} cr {:>8} = {}",
            row.entry_number.as_deref().unwrap_or("-"),
            row.description.as_deref().unwrap_or("-"),
            row.debit_amount,
            row.credit_amount,
            row.running_balance
        );
    }
    println!("  Closing balance: ₹{}", page.closing_balance);

    // 5. Trial balance
    println!("\n🔍 Trial Balance as of March 31, 2024:");
    let report = core
        .trial_balance(
            &TrialBalanceQuery::new(fy.id, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
                .exclude_zero()
                .group_by_type(),
        )
        .await?;
    for group in report.groups.as_deref().unwrap_or(&[]) {
        println!("  {:?}:", group.account_type);
        for row in &group.rows {
            println!(
                "    {} {:<22} dr {:>8} cr {:>8}",
                row.account_code,
                row.account_name,
                row.debit_balance.clone().unwrap_or_default(),
                row.credit_balance.clone().unwrap_or_default()
            );
        }
    }
    println!("  Total Debits:  ₹{}", report.total_debits);
    println!("  Total Credits: ₹{}", report.total_credits);
    println!(
        "  Balanced: {}",
        if report.is_balanced { "✅ Yes" } else { "❌ No" }
    );

    // 6. Close the year
    println!("\n🔒 Closing Financial Year...");
    let closed = core.close_financial_year(fy.id, "finance-controller").await?;
    println!(
        "  ✓ {} closed by {}",
        closed.year_name,
        closed.closed_by.as_deref().unwrap_or("?")
    );

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
