//! Core types and data structures for the accounting system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the hospital owns (Cash, Receivables, Equipment, etc.)
    Asset,
    /// Liabilities - what the hospital owes (Loans, Accounts Payable, etc.)
    Liability,
    /// Equity - owners' interest (Capital, Retained Earnings, etc.)
    Equity,
    /// Revenue - money earned (patient services, pharmacy sales, etc.)
    Revenue,
    /// Expenses - costs incurred (salaries, supplies, utilities, etc.)
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Revenue normally carry credit balances.
    pub fn normal_side(&self) -> BalanceSide {
        match self {
            AccountType::Asset | AccountType::Expense => BalanceSide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                BalanceSide::Credit
            }
        }
    }

    /// Converts a debit/credit pair into a signed balance change for this
    /// account type: debit-normal accounts grow with debits, credit-normal
    /// accounts grow with credits.
    pub fn balance_delta(&self, debit: &BigDecimal, credit: &BigDecimal) -> BigDecimal {
        match self.normal_side() {
            BalanceSide::Debit => debit - credit,
            BalanceSide::Credit => credit - debit,
        }
    }
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceSide {
    Debit,
    Credit,
}

/// A node in the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier for the account
    pub id: Uuid,
    /// Business-facing code, unique across all accounts (active or not)
    pub account_code: String,
    /// Human-readable account name
    pub account_name: String,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Optional parent account for the hierarchical chart of accounts
    pub parent_account_id: Option<Uuid>,
    /// Optional hospital department this account belongs to
    pub department_id: Option<Uuid>,
    /// Inactive accounts reject new postings but keep their history
    pub is_active: bool,
    /// Balance the account started with
    pub opening_balance: BigDecimal,
    /// Running balance; mutated only by journal postings
    pub current_balance: BigDecimal,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the account was last updated
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Signed balance change this account experiences for a debit/credit pair
    pub fn balance_delta(&self, debit: &BigDecimal, credit: &BigDecimal) -> BigDecimal {
        self.account_type.balance_delta(debit, credit)
    }
}

/// Lifecycle state of a financial year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearStatus {
    /// Open for postings
    Active,
    /// Closed to postings; may be reopened while no later year is closed
    Closed,
}

/// A bounded fiscal period postings are scoped to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialYear {
    pub id: Uuid,
    /// Unique display name, e.g. "FY 2024-25"
    pub year_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: YearStatus,
    /// At most one year is current at any time
    pub is_current: bool,
    /// Who closed the year, stamped on Active -> Closed
    pub closed_by: Option<String>,
    pub closed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl FinancialYear {
    /// Whether a date falls inside this year's [start, end] range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether [start, end] overlaps this year's range. Covers all three
    /// cases: start inside, end inside, and full enclosure.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && self.start_date <= end
    }
}

/// Lifecycle state of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Recorded but not yet applied to account balances
    Draft,
    /// Applied to account balances; immutable except for the reversal link
    Posted,
}

/// One debit or credit line within a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryItem {
    /// Account being affected
    pub account_id: Uuid,
    /// Debit amount, zero when the item is a credit
    pub debit_amount: BigDecimal,
    /// Credit amount, zero when the item is a debit
    pub credit_amount: BigDecimal,
    /// Optional description for this specific line
    pub description: Option<String>,
}

impl JournalEntryItem {
    /// Create a debit line
    pub fn debit(account_id: Uuid, amount: BigDecimal, description: Option<String>) -> Self {
        Self {
            account_id,
            debit_amount: amount,
            credit_amount: BigDecimal::from(0),
            description,
        }
    }

    /// Create a credit line
    pub fn credit(account_id: Uuid, amount: BigDecimal, description: Option<String>) -> Self {
        Self {
            account_id,
            debit_amount: BigDecimal::from(0),
            credit_amount: amount,
            description,
        }
    }
}

/// A balanced set of debit/credit lines representing one business transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    /// Unique business-facing number, e.g. "JE-000042"
    pub entry_number: String,
    pub entry_date: NaiveDate,
    /// Fiscal period the entry belongs to
    pub financial_year_id: Uuid,
    /// Opaque link to the originating business document (invoice number, etc.)
    pub reference: Option<String>,
    /// Kind of originating document ("INVOICE", "PAYMENT", "REVERSAL", ...)
    pub reference_type: Option<String>,
    pub description: Option<String>,
    pub status: EntryStatus,
    /// Set when an offsetting reversal entry has been posted against this one
    pub reversed_by: Option<Uuid>,
    /// Ordered debit/credit lines
    pub items: Vec<JournalEntryItem>,
    pub created_at: NaiveDateTime,
    pub posted_at: Option<NaiveDateTime>,
}

impl JournalEntry {
    /// Sum of all debit amounts
    pub fn total_debits(&self) -> BigDecimal {
        self.items.iter().map(|i| &i.debit_amount).sum()
    }

    /// Sum of all credit amounts
    pub fn total_credits(&self) -> BigDecimal {
        self.items.iter().map(|i| &i.credit_amount).sum()
    }

    /// Whether debits equal credits exactly
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

/// One ledger line for an account, carrying the running balance.
///
/// The synthetic opening-balance row has no entry fields and is always
/// row zero of page one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub entry_id: Option<Uuid>,
    pub entry_number: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    /// Balance after this line
    pub running_balance: BigDecimal,
}

impl LedgerRow {
    /// The synthetic opening-balance row prefixing page one
    pub fn opening(balance: BigDecimal) -> Self {
        Self {
            entry_id: None,
            entry_number: None,
            entry_date: None,
            description: Some("Opening balance".to_string()),
            reference: None,
            debit_amount: BigDecimal::from(0),
            credit_amount: BigDecimal::from(0),
            running_balance: balance,
        }
    }
}

/// One page of an account's reconstructed ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerPage {
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    /// Balance at the start of the requested window
    pub opening_balance: BigDecimal,
    pub rows: Vec<LedgerRow>,
    pub page: u32,
    pub page_size: u32,
    /// Transaction rows across the whole window, excluding the opening row
    pub total_rows: u64,
    pub total_pages: u32,
    /// Totals over the whole window, not just this page
    pub total_debits: BigDecimal,
    pub total_credits: BigDecimal,
    /// Running balance after the last item in the window
    pub closing_balance: BigDecimal,
}

/// One account's line in a trial balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub opening_balance: BigDecimal,
    /// Sum of posted debit amounts up to the as-of date
    pub total_debits: BigDecimal,
    /// Sum of posted credit amounts up to the as-of date
    pub total_credits: BigDecimal,
    /// Signed balance: opening plus the type-aware net of activity
    pub balance: BigDecimal,
    /// Debit column placement (debit-normal positive or credit-normal negative)
    pub debit_balance: Option<BigDecimal>,
    /// Credit column placement (credit-normal positive or debit-normal negative)
    pub credit_balance: Option<BigDecimal>,
}

/// Rows of one account type with per-group subtotals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceGroup {
    pub account_type: AccountType,
    pub rows: Vec<TrialBalanceRow>,
    pub subtotal_debits: BigDecimal,
    pub subtotal_credits: BigDecimal,
}

/// Point-in-time trial balance across all active accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    pub financial_year_id: Uuid,
    pub as_of_date: NaiveDate,
    /// All rows ordered by account code
    pub rows: Vec<TrialBalanceRow>,
    /// Present when grouping by account type was requested
    pub groups: Option<Vec<TrialBalanceGroup>>,
    /// Sum of the debit column across all rows
    pub total_debits: BigDecimal,
    /// Sum of the credit column across all rows
    pub total_credits: BigDecimal,
    /// Whether the columns net to zero within the configured tolerance
    pub is_balanced: bool,
}

/// Broad classification of an accounting error, for callers that map
/// rejections onto transport-level responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input; rejected before any mutation
    Validation,
    /// Business-rule conflict with existing data; rejected before mutation
    Conflict,
    /// Operation not permitted in the current lifecycle state
    State,
    /// The books themselves are inconsistent; indicates a deeper bug
    Integrity,
    /// The backing store failed
    Infrastructure,
}

/// Errors that can occur in the accounting core
#[derive(Debug, thiserror::Error)]
pub enum AccountingError {
    #[error("account code '{code}' is already in use")]
    DuplicateCode { code: String },
    #[error("parent account {parent_id} does not exist")]
    ParentNotFound { parent_id: Uuid },
    #[error("account type {child:?} does not match parent account type {parent:?}")]
    TypeMismatch {
        child: AccountType,
        parent: AccountType,
    },
    #[error("account {account_id} cannot be its own parent")]
    SelfParent { account_id: Uuid },
    #[error(
        "account {parent_id} is a descendant of {account_id}; linking them would create a cycle"
    )]
    CycleDetected { account_id: Uuid, parent_id: Uuid },
    #[error("account {account_id} has active children whose type would no longer match")]
    ChildTypeConflict { account_id: Uuid },
    #[error("account {account_id} has active child accounts")]
    HasActiveChildren { account_id: Uuid },
    #[error("account {account_id} has journal postings")]
    HasPostings { account_id: Uuid },
    #[error("account {account_id} not found")]
    AccountNotFound { account_id: Uuid },
    #[error("account '{account_code}' ({account_id}) is inactive")]
    InactiveAccount {
        account_id: Uuid,
        account_code: String,
    },

    #[error("financial year '{year_name}' already exists")]
    DuplicateYearName { year_name: String },
    #[error("start date {start} must fall before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("period {start}..{end} overlaps financial year '{conflicting_year}'")]
    OverlappingPeriod {
        start: NaiveDate,
        end: NaiveDate,
        conflicting_year: String,
    },
    #[error("financial year {year_id} not found")]
    YearNotFound { year_id: Uuid },
    #[error("no financial year is marked as current")]
    NoCurrentYear,
    #[error("financial year '{year_name}' still has {draft_count} draft entries")]
    OpenDraftEntries { year_name: String, draft_count: u64 },
    #[error("cannot reopen '{year_name}': later financial year '{closed_year}' is already closed")]
    NewerYearClosed {
        year_name: String,
        closed_year: String,
    },
    #[error("financial year '{year_name}' has journal entries")]
    HasEntries { year_name: String },
    #[error("financial year '{year_name}' is closed")]
    PeriodClosed { year_name: String },
    #[error("date {date} falls outside financial year '{year_name}' ({start}..{end})")]
    DateOutOfPeriod {
        date: NaiveDate,
        year_name: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("entry is not balanced: debits = {debits}, credits = {credits}")]
    Unbalanced {
        debits: BigDecimal,
        credits: BigDecimal,
    },
    #[error("journal entry number '{entry_number}' already exists")]
    DuplicateEntryNumber { entry_number: String },
    #[error("journal entry {entry_id} not found")]
    EntryNotFound { entry_id: Uuid },
    #[error("journal entry '{entry_number}' is not a draft")]
    AlreadyPosted { entry_number: String },
    #[error("journal entry '{entry_number}' has not been posted")]
    EntryNotPosted { entry_number: String },
    #[error("journal entry '{entry_number}' was already reversed by entry {reversed_by}")]
    AlreadyReversed {
        entry_number: String,
        reversed_by: Uuid,
    },

    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl AccountingError {
    /// Classify this error into the broad taxonomy callers route on
    pub fn kind(&self) -> ErrorKind {
        use AccountingError::*;
        match self {
            DuplicateCode { .. }
            | TypeMismatch { .. }
            | SelfParent { .. }
            | CycleDetected { .. }
            | ChildTypeConflict { .. }
            | DuplicateYearName { .. }
            | OverlappingPeriod { .. }
            | DuplicateEntryNumber { .. } => ErrorKind::Conflict,

            HasActiveChildren { .. }
            | HasPostings { .. }
            | InactiveAccount { .. }
            | OpenDraftEntries { .. }
            | NewerYearClosed { .. }
            | HasEntries { .. }
            | PeriodClosed { .. }
            | AlreadyPosted { .. }
            | EntryNotPosted { .. }
            | AlreadyReversed { .. } => ErrorKind::State,

            ParentNotFound { .. }
            | AccountNotFound { .. }
            | YearNotFound { .. }
            | NoCurrentYear
            | EntryNotFound { .. }
            | InvalidRange { .. }
            | DateOutOfPeriod { .. }
            | Validation(_) => ErrorKind::Validation,

            Unbalanced { .. } => ErrorKind::Integrity,

            Storage(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for accounting operations
pub type AccountingResult<T> = Result<T, AccountingError>;
