//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::*;

/// Filter for chart-of-accounts listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountFilter {
    /// Restrict to one account type
    pub account_type: Option<AccountType>,
    /// Restrict to one department
    pub department_id: Option<Uuid>,
    /// Include deactivated accounts
    pub include_inactive: bool,
}

/// A pending balance adjustment for one account, produced by validating a
/// journal entry. Deltas are pre-aggregated per account and sorted by
/// ascending account id so implementations that lock per row acquire locks
/// in a deadlock-free order.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceDelta {
    pub account_id: Uuid,
    pub delta: BigDecimal,
}

/// Storage abstraction for the accounting core
///
/// This trait allows the core to work with any backend (PostgreSQL, MySQL,
/// SQLite, in-memory, etc.). Implementations must uphold two transactional
/// contracts:
///
/// - [`apply_posting`](Self::apply_posting) commits the entry write, every
///   balance adjustment, and the optional reversal back-link as one
///   all-or-nothing unit. A reader must never observe the entry without its
///   balance effects or vice versa.
/// - [`insert_financial_year`](Self::insert_financial_year) and
///   [`update_financial_year`](Self::update_financial_year) clear the
///   previous current year's flag and set the new one inside the same
///   transaction whenever the written year has `is_current` set.
#[async_trait]
pub trait AccountingStorage: Send + Sync {
    /// Insert a new account. Fails with [`AccountingError::DuplicateCode`]
    /// when the code is already taken.
    async fn insert_account(&mut self, account: &Account) -> AccountingResult<()>;

    /// Get an account by id
    async fn get_account(&self, account_id: Uuid) -> AccountingResult<Option<Account>>;

    /// Look an account up by its business code, active or not
    async fn find_account_by_code(&self, code: &str) -> AccountingResult<Option<Account>>;

    /// List accounts matching a filter
    async fn list_accounts(&self, filter: &AccountFilter) -> AccountingResult<Vec<Account>>;

    /// List the direct children of an account
    async fn list_child_accounts(&self, parent_id: Uuid) -> AccountingResult<Vec<Account>>;

    /// Overwrite an existing account's stored state
    async fn update_account(&mut self, account: &Account) -> AccountingResult<()>;

    /// Whether any journal entry, draft or posted, references the account
    async fn account_has_postings(&self, account_id: Uuid) -> AccountingResult<bool>;

    /// Insert a new financial year; atomically clears any other current
    /// year when `year.is_current` is set
    async fn insert_financial_year(&mut self, year: &FinancialYear) -> AccountingResult<()>;

    /// Get a financial year by id
    async fn get_financial_year(&self, year_id: Uuid) -> AccountingResult<Option<FinancialYear>>;

    /// Look a financial year up by its unique name
    async fn find_year_by_name(&self, year_name: &str) -> AccountingResult<Option<FinancialYear>>;

    /// All financial years, ordered by start date
    async fn list_financial_years(&self) -> AccountingResult<Vec<FinancialYear>>;

    /// Overwrite an existing year's stored state; atomically clears any
    /// other current year when `year.is_current` is set
    async fn update_financial_year(&mut self, year: &FinancialYear) -> AccountingResult<()>;

    /// Remove a financial year. The core only calls this after verifying
    /// the year has no journal entries.
    async fn delete_financial_year(&mut self, year_id: Uuid) -> AccountingResult<()>;

    /// The year currently flagged as current, if any
    async fn current_financial_year(&self) -> AccountingResult<Option<FinancialYear>>;

    /// Count journal entries in a year, optionally restricted to a status
    async fn count_entries(
        &self,
        year_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AccountingResult<u64>;

    /// Next value of the monotonically increasing entry-number sequence
    async fn next_entry_sequence(&mut self) -> AccountingResult<u64>;

    /// Insert a journal entry without touching balances (drafts). Fails
    /// with [`AccountingError::DuplicateEntryNumber`] on a taken number.
    async fn insert_journal_entry(&mut self, entry: &JournalEntry) -> AccountingResult<()>;

    /// Get a journal entry by id
    async fn get_journal_entry(&self, entry_id: Uuid) -> AccountingResult<Option<JournalEntry>>;

    /// Look a journal entry up by its unique number; callers use this to
    /// detect whether a timed-out posting actually committed
    async fn find_entry_by_number(
        &self,
        entry_number: &str,
    ) -> AccountingResult<Option<JournalEntry>>;

    /// Commit a posting as one transaction: upsert `entry` (already marked
    /// posted), apply every balance delta, and when `reverses` names an
    /// entry, stamp its `reversed_by` link. Nothing may be observable
    /// half-applied, and a duplicate entry number must roll the whole unit
    /// back with [`AccountingError::DuplicateEntryNumber`].
    async fn apply_posting(
        &mut self,
        entry: &JournalEntry,
        deltas: &[BalanceDelta],
        reverses: Option<Uuid>,
    ) -> AccountingResult<()>;

    /// Posted entries touching an account within an inclusive date window
    async fn list_posted_entries_for_account(
        &self,
        account_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> AccountingResult<Vec<JournalEntry>>;

    /// Posted entries of a financial year dated up to `to_date` inclusive
    async fn list_posted_entries(
        &self,
        year_id: Uuid,
        to_date: Option<NaiveDate>,
    ) -> AccountingResult<Vec<JournalEntry>>;
}
