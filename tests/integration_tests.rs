//! Integration tests for hms-accounting

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use hms_accounting::utils::MemoryStorage;
use hms_accounting::{
    AccountFilter, AccountPatch, AccountType, AccountingCore, AccountingError, EntryStatus,
    ErrorKind, JournalEntry, JournalEntryBuilder, JournalEntryItem, LedgerQuery, NewAccount,
    NewFinancialYear, TrialBalanceQuery, YearStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn core_with_current_year() -> (AccountingCore<MemoryStorage>, MemoryStorage, Uuid) {
    let storage = MemoryStorage::new();
    let mut core = AccountingCore::new(storage.clone());
    let year = core
        .create_financial_year(
            NewFinancialYear::new("FY 2024", date(2024, 1, 1), date(2024, 12, 31)).current(),
        )
        .await
        .unwrap();
    (core, storage, year.id)
}

#[tokio::test]
async fn cash_sale_scenario_balances_the_books() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 5, 10), "Cash sale")
        .debit(cash.id, BigDecimal::from(1000))
        .credit(sales.id, BigDecimal::from(1000))
        .build()
        .unwrap();
    core.post_journal_entry(draft).await.unwrap();

    assert_eq!(
        core.account_balance(cash.id).await.unwrap(),
        BigDecimal::from(1000)
    );
    assert_eq!(
        core.account_balance(sales.id).await.unwrap(),
        BigDecimal::from(1000)
    );

    let report = core
        .trial_balance(&TrialBalanceQuery::new(year_id, date(2024, 5, 10)))
        .await
        .unwrap();
    assert!(report.is_balanced);

    let cash_row = report
        .rows
        .iter()
        .find(|r| r.account_id == cash.id)
        .unwrap();
    assert_eq!(cash_row.debit_balance, Some(BigDecimal::from(1000)));
    assert_eq!(cash_row.credit_balance, None);

    let sales_row = report
        .rows
        .iter()
        .find(|r| r.account_id == sales.id)
        .unwrap();
    assert_eq!(sales_row.credit_balance, Some(BigDecimal::from(1000)));
    assert_eq!(sales_row.debit_balance, None);
}

#[tokio::test]
async fn unbalanced_posting_is_rejected_without_mutation() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    // bypass the builder so the unbalanced draft reaches the ledger itself
    let draft = hms_accounting::JournalEntryDraft {
        entry_number: None,
        entry_date: date(2024, 5, 10),
        financial_year_id: None,
        reference: None,
        reference_type: None,
        description: Some("Mistyped amounts".to_string()),
        items: vec![
            JournalEntryItem::debit(cash.id, BigDecimal::from(500), None),
            JournalEntryItem::credit(sales.id, BigDecimal::from(400), None),
        ],
    };

    let result = core.post_journal_entry(draft).await;
    match result {
        Err(AccountingError::Unbalanced { debits, credits }) => {
            assert_eq!(debits, BigDecimal::from(500));
            assert_eq!(credits, BigDecimal::from(400));
        }
        other => panic!("expected Unbalanced, got {other:?}"),
    }

    assert_eq!(
        core.account_balance(cash.id).await.unwrap(),
        BigDecimal::from(0)
    );
    assert_eq!(
        core.account_balance(sales.id).await.unwrap(),
        BigDecimal::from(0)
    );
}

#[tokio::test]
async fn revenue_account_cannot_parent_an_asset() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let result = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset).with_parent(sales.id))
        .await;

    assert!(matches!(
        result,
        Err(AccountingError::TypeMismatch {
            child: AccountType::Asset,
            parent: AccountType::Revenue,
        })
    ));
}

#[tokio::test]
async fn overlapping_financial_years_are_rejected() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let result = core
        .create_financial_year(NewFinancialYear::new(
            "FY 2024-25",
            date(2024, 6, 1),
            date(2025, 5, 31),
        ))
        .await;

    match result {
        Err(AccountingError::OverlappingPeriod {
            conflicting_year, ..
        }) => assert_eq!(conflicting_year, "FY 2024"),
        other => panic!("expected OverlappingPeriod, got {other:?}"),
    }
}

#[tokio::test]
async fn closing_is_blocked_by_draft_entries() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 7, 1), "Pending adjustment")
        .debit(cash.id, BigDecimal::from(250))
        .credit(sales.id, BigDecimal::from(250))
        .build()
        .unwrap();
    let saved = core.save_draft_entry(draft).await.unwrap();
    assert_eq!(saved.status, EntryStatus::Draft);

    let result = core.close_financial_year(year_id, "controller").await;
    match result {
        Err(AccountingError::OpenDraftEntries { draft_count, .. }) => {
            assert_eq!(draft_count, 1)
        }
        other => panic!("expected OpenDraftEntries, got {other:?}"),
    }

    // posting the draft unblocks the close
    core.post_draft_entry(saved.id).await.unwrap();
    let closed = core
        .close_financial_year(year_id, "controller")
        .await
        .unwrap();
    assert_eq!(closed.status, YearStatus::Closed);
    assert_eq!(closed.closed_by.as_deref(), Some("controller"));
    assert!(closed.closed_at.is_some());
}

#[tokio::test]
async fn posting_into_a_closed_year_is_rejected() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    core.close_financial_year(year_id, "controller")
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 8, 1), "Late entry")
        .debit(cash.id, BigDecimal::from(100))
        .credit(sales.id, BigDecimal::from(100))
        .build()
        .unwrap();

    let result = core.post_journal_entry(draft).await;
    assert!(matches!(result, Err(AccountingError::PeriodClosed { .. })));
    assert_eq!(
        result.unwrap_err().kind(),
        ErrorKind::State
    );
}

#[tokio::test]
async fn entry_date_must_fall_inside_the_year() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2025, 1, 15), "Wrong period")
        .financial_year(year_id)
        .debit(cash.id, BigDecimal::from(100))
        .credit(sales.id, BigDecimal::from(100))
        .build()
        .unwrap();

    let result = core.post_journal_entry(draft).await;
    assert!(matches!(
        result,
        Err(AccountingError::DateOutOfPeriod { date, .. }) if date == NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    ));
}

#[tokio::test]
async fn inactive_accounts_reject_postings_but_keep_history() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();
    let idle = core
        .create_account(NewAccount::new("1900", "Old Petty Cash", AccountType::Asset))
        .await
        .unwrap();

    core.deactivate_account(idle.id).await.unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 5, 1), "Posting to retired account")
        .debit(idle.id, BigDecimal::from(50))
        .credit(sales.id, BigDecimal::from(50))
        .build()
        .unwrap();
    let result = core.post_journal_entry(draft).await;
    assert!(matches!(
        result,
        Err(AccountingError::InactiveAccount { account_id, .. }) if account_id == idle.id
    ));

    // an account with postings can only be soft-deleted, never purged
    let draft = JournalEntryBuilder::new(date(2024, 5, 2), "Cash sale")
        .debit(cash.id, BigDecimal::from(75))
        .credit(sales.id, BigDecimal::from(75))
        .build()
        .unwrap();
    core.post_journal_entry(draft).await.unwrap();

    let result = core.deactivate_account(cash.id).await;
    assert!(matches!(result, Err(AccountingError::HasPostings { .. })));
}

#[tokio::test]
async fn deactivation_requires_children_first() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let parent = core
        .create_account(NewAccount::new("1000", "Current Assets", AccountType::Asset))
        .await
        .unwrap();
    let child = core
        .create_account(NewAccount::new("1100", "Cash", AccountType::Asset).with_parent(parent.id))
        .await
        .unwrap();

    let result = core.deactivate_account(parent.id).await;
    assert!(matches!(
        result,
        Err(AccountingError::HasActiveChildren { .. })
    ));

    core.deactivate_account(child.id).await.unwrap();
    let parent = core.deactivate_account(parent.id).await.unwrap();
    assert!(!parent.is_active);
}

#[tokio::test]
async fn reversal_restores_balances_and_links_the_original() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(
            NewAccount::new("1000", "Cash", AccountType::Asset)
                .with_opening_balance(BigDecimal::from(5000)),
        )
        .await
        .unwrap();
    let expense = core
        .create_account(NewAccount::new("5000", "Medical Supplies", AccountType::Expense))
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 4, 2), "Supplies purchase")
        .debit(expense.id, BigDecimal::from(1300))
        .credit(cash.id, BigDecimal::from(1300))
        .build()
        .unwrap();
    let entry = core.post_journal_entry(draft).await.unwrap();

    assert_eq!(
        core.account_balance(cash.id).await.unwrap(),
        BigDecimal::from(3700)
    );
    assert_eq!(
        core.account_balance(expense.id).await.unwrap(),
        BigDecimal::from(1300)
    );

    let reversal = core
        .reverse_entry(entry.id, "Duplicate supplier invoice")
        .await
        .unwrap();
    assert_eq!(reversal.reference.as_deref(), Some(entry.entry_number.as_str()));
    assert_eq!(reversal.reference_type.as_deref(), Some("REVERSAL"));
    assert!(reversal.is_balanced());

    // balances return to their pre-posting values
    assert_eq!(
        core.account_balance(cash.id).await.unwrap(),
        BigDecimal::from(5000)
    );
    assert_eq!(
        core.account_balance(expense.id).await.unwrap(),
        BigDecimal::from(0)
    );

    // the original is linked, untouched, and cannot be reversed twice
    let original = core.journal_entry(entry.id).await.unwrap().unwrap();
    assert_eq!(original.reversed_by, Some(reversal.id));
    assert_eq!(original.items, entry.items);

    let result = core.reverse_entry(entry.id, "Again").await;
    assert!(matches!(
        result,
        Err(AccountingError::AlreadyReversed { .. })
    ));
}

#[tokio::test]
async fn ledger_pages_carry_running_balances_across_pages() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(
            NewAccount::new("1000", "Cash", AccountType::Asset)
                .with_opening_balance(BigDecimal::from(100)),
        )
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    for day in 1..=5u32 {
        let draft = JournalEntryBuilder::new(date(2024, 3, day), "Daily takings")
            .debit(cash.id, BigDecimal::from(10))
            .credit(sales.id, BigDecimal::from(10))
            .build()
            .unwrap();
        core.post_journal_entry(draft).await.unwrap();
    }

    let page1 = core
        .ledger(&LedgerQuery::for_account(cash.id).in_year(year_id).page(1, 2))
        .await
        .unwrap();

    // synthetic opening row plus the first two items
    assert_eq!(page1.rows.len(), 3);
    assert_eq!(page1.rows[0].entry_id, None);
    assert_eq!(page1.rows[0].running_balance, BigDecimal::from(100));
    assert_eq!(page1.rows[1].running_balance, BigDecimal::from(110));
    assert_eq!(page1.rows[2].running_balance, BigDecimal::from(120));
    assert_eq!(page1.total_rows, 5);
    assert_eq!(page1.total_pages, 3);
    assert_eq!(page1.total_debits, BigDecimal::from(50));
    assert_eq!(page1.total_credits, BigDecimal::from(0));
    assert_eq!(page1.closing_balance, BigDecimal::from(150));

    // page two starts from the replayed running balance, no opening row
    let page2 = core
        .ledger(&LedgerQuery::for_account(cash.id).in_year(year_id).page(2, 2))
        .await
        .unwrap();
    assert_eq!(page2.rows.len(), 2);
    assert!(page2.rows[0].entry_id.is_some());
    assert_eq!(page2.rows[0].running_balance, BigDecimal::from(130));
    assert_eq!(page2.rows[1].running_balance, BigDecimal::from(140));
    assert_eq!(page2.closing_balance, BigDecimal::from(150));
}

#[tokio::test]
async fn ledger_window_excludes_prior_activity_into_the_opening_balance() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    for (month, amount) in [(2, 400), (5, 300), (9, 200)] {
        let draft = JournalEntryBuilder::new(date(2024, month, 15), "Takings")
            .debit(cash.id, BigDecimal::from(amount))
            .credit(sales.id, BigDecimal::from(amount))
            .build()
            .unwrap();
        core.post_journal_entry(draft).await.unwrap();
    }

    let page = core
        .ledger(
            &LedgerQuery::for_account(cash.id).between(date(2024, 4, 1), date(2024, 6, 30)),
        )
        .await
        .unwrap();

    // February's posting folds into the opening balance
    assert_eq!(page.opening_balance, BigDecimal::from(400));
    assert_eq!(page.total_rows, 1);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.closing_balance, BigDecimal::from(700));
    assert_eq!(page.total_debits, BigDecimal::from(300));
}

#[tokio::test]
async fn trial_balance_groups_and_drops_zero_rows_on_request() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();
    core.create_account(NewAccount::new("6000", "Unused Expense", AccountType::Expense))
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 2, 1), "Cash sale")
        .debit(cash.id, BigDecimal::from(900))
        .credit(sales.id, BigDecimal::from(900))
        .build()
        .unwrap();
    core.post_journal_entry(draft).await.unwrap();

    let report = core
        .trial_balance(
            &TrialBalanceQuery::new(year_id, date(2024, 12, 31))
                .exclude_zero()
                .group_by_type(),
        )
        .await
        .unwrap();

    assert!(report.is_balanced);
    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.balance != BigDecimal::from(0)));

    let groups = report.groups.as_ref().unwrap();
    assert_eq!(groups.len(), 2);
    let asset_group = groups
        .iter()
        .find(|g| g.account_type == AccountType::Asset)
        .unwrap();
    assert_eq!(asset_group.subtotal_debits, BigDecimal::from(900));
    assert_eq!(asset_group.subtotal_credits, BigDecimal::from(0));
}

#[tokio::test]
async fn trial_balance_rejects_dates_outside_the_year() {
    let (core, _storage, year_id) = core_with_current_year().await;

    let result = core
        .trial_balance(&TrialBalanceQuery::new(year_id, date(2025, 1, 1)))
        .await;
    assert!(matches!(
        result,
        Err(AccountingError::DateOutOfPeriod { .. })
    ));
}

#[tokio::test]
async fn injected_unbalanced_write_is_surfaced_not_fixed() {
    let (mut core, storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 2, 1), "Cash sale")
        .debit(cash.id, BigDecimal::from(500))
        .credit(sales.id, BigDecimal::from(500))
        .build()
        .unwrap();
    core.post_journal_entry(draft).await.unwrap();

    // corrupt the books behind the ledger's back: a posted entry whose
    // lines do not balance
    let now = chrono::Utc::now().naive_utc();
    storage.inject_entry_unchecked(JournalEntry {
        id: Uuid::new_v4(),
        entry_number: "JE-BAD".to_string(),
        entry_date: date(2024, 2, 2),
        financial_year_id: year_id,
        reference: None,
        reference_type: None,
        description: None,
        status: EntryStatus::Posted,
        reversed_by: None,
        items: vec![JournalEntryItem::debit(
            cash.id,
            BigDecimal::from(100),
            None,
        )],
        created_at: now,
        posted_at: Some(now),
    });

    let report = core
        .trial_balance(&TrialBalanceQuery::new(year_id, date(2024, 12, 31)))
        .await
        .unwrap();

    assert!(!report.is_balanced);
    // the residual is reported as-is, not coerced away
    assert_eq!(
        &report.total_debits - &report.total_credits,
        BigDecimal::from(100)
    );
}

#[tokio::test]
async fn supplied_entry_numbers_detect_duplicate_submissions() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let build = |n: &str| {
        JournalEntryBuilder::new(date(2024, 6, 1), "Invoice INV-77")
            .entry_number(n)
            .debit(cash.id, BigDecimal::from(650))
            .credit(sales.id, BigDecimal::from(650))
            .build()
            .unwrap()
    };

    core.post_journal_entry(build("JE-INV-77")).await.unwrap();

    // the retry of a committed posting is rejected, not double-applied
    let result = core.post_journal_entry(build("JE-INV-77")).await;
    assert!(matches!(
        result,
        Err(AccountingError::DuplicateEntryNumber { .. })
    ));
    assert_eq!(
        core.account_balance(cash.id).await.unwrap(),
        BigDecimal::from(650)
    );
    assert!(core
        .journal_entry_by_number("JE-INV-77")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn deleting_a_year_requires_it_to_be_empty() {
    let (mut core, _storage, year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();

    let empty_year = core
        .create_financial_year(NewFinancialYear::new(
            "FY 2025",
            date(2025, 1, 1),
            date(2025, 12, 31),
        ))
        .await
        .unwrap();
    core.delete_financial_year(empty_year.id).await.unwrap();

    let draft = JournalEntryBuilder::new(date(2024, 3, 1), "Cash sale")
        .debit(cash.id, BigDecimal::from(10))
        .credit(sales.id, BigDecimal::from(10))
        .build()
        .unwrap();
    core.post_journal_entry(draft).await.unwrap();

    let result = core.delete_financial_year(year_id).await;
    assert!(matches!(result, Err(AccountingError::HasEntries { .. })));
}

#[tokio::test]
async fn current_balance_tracks_every_posting_sequence() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(
            NewAccount::new("1000", "Cash", AccountType::Asset)
                .with_opening_balance(BigDecimal::from(1000)),
        )
        .await
        .unwrap();
    let sales = core
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();
    let supplies = core
        .create_account(NewAccount::new("5000", "Supplies", AccountType::Expense))
        .await
        .unwrap();

    let takings = JournalEntryBuilder::new(date(2024, 2, 1), "Takings")
        .debit(cash.id, BigDecimal::from(400))
        .credit(sales.id, BigDecimal::from(400))
        .build()
        .unwrap();
    core.post_journal_entry(takings).await.unwrap();

    let purchase = JournalEntryBuilder::new(date(2024, 2, 3), "Supplies")
        .debit(supplies.id, BigDecimal::from(150))
        .credit(cash.id, BigDecimal::from(150))
        .build()
        .unwrap();
    let purchase = core.post_journal_entry(purchase).await.unwrap();

    core.reverse_entry(purchase.id, "Returned goods")
        .await
        .unwrap();

    // opening 1000 + 400 takings - 150 purchase + 150 reversal
    assert_eq!(
        core.account_balance(cash.id).await.unwrap(),
        BigDecimal::from(1400)
    );
    assert_eq!(
        core.account_balance(supplies.id).await.unwrap(),
        BigDecimal::from(0)
    );

    // the ledger view reconstructs the same closing balance from history
    let page = core
        .ledger(&LedgerQuery::for_account(cash.id))
        .await
        .unwrap();
    assert_eq!(page.closing_balance, BigDecimal::from(1400));
}

#[tokio::test]
async fn account_listing_filters_by_type_and_activity() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    core.create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    let old = core
        .create_account(NewAccount::new("1900", "Old Cash", AccountType::Asset))
        .await
        .unwrap();
    core.create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .await
        .unwrap();
    core.deactivate_account(old.id).await.unwrap();

    let assets = core
        .accounts(&AccountFilter {
            account_type: Some(AccountType::Asset),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(assets.len(), 1);

    let all_assets = core
        .accounts(&AccountFilter {
            account_type: Some(AccountType::Asset),
            include_inactive: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all_assets.len(), 2);
}

#[tokio::test]
async fn account_code_updates_recheck_uniqueness() {
    let (mut core, _storage, _year_id) = core_with_current_year().await;

    let cash = core
        .create_account(NewAccount::new("1000", "Cash", AccountType::Asset))
        .await
        .unwrap();
    core.create_account(NewAccount::new("1100", "Bank", AccountType::Asset))
        .await
        .unwrap();

    let result = core
        .update_account(
            cash.id,
            AccountPatch {
                account_code: Some("1100".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AccountingError::DuplicateCode { .. })));
}
