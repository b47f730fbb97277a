//! Facade wiring the accounting components over one storage backend

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::config::AccountingConfig;
use crate::ledger::accounts::{AccountPatch, AccountRegistry, NewAccount};
use crate::ledger::journal::{JournalEntryDraft, JournalLedger};
use crate::ledger::trial_balance::{TrialBalanceGenerator, TrialBalanceQuery};
use crate::ledger::view::{LedgerQuery, LedgerView};
use crate::ledger::years::{FinancialYearManager, FinancialYearPatch, NewFinancialYear};
use crate::traits::*;
use crate::types::*;

/// The accounting core exposed to business-workflow callers: chart of
/// accounts, financial years, journal posting, ledgers, and trial
/// balances over a single storage backend
pub struct AccountingCore<S: AccountingStorage> {
    accounts: AccountRegistry<S>,
    years: FinancialYearManager<S>,
    journal: JournalLedger<S>,
    view: LedgerView<S>,
    trial_balance: TrialBalanceGenerator<S>,
    config: AccountingConfig,
}

impl<S: AccountingStorage + Clone> AccountingCore<S> {
    /// Create a core with the default configuration
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, AccountingConfig::default())
    }

    /// Create a core with host-supplied configuration
    pub fn with_config(storage: S, config: AccountingConfig) -> Self {
        Self {
            accounts: AccountRegistry::new(storage.clone()),
            years: FinancialYearManager::new(storage.clone()),
            journal: JournalLedger::new(storage.clone(), config.clone()),
            view: LedgerView::new(storage.clone()),
            trial_balance: TrialBalanceGenerator::new(storage, config.clone()),
            config,
        }
    }

    /// The injected configuration
    pub fn config(&self) -> &AccountingConfig {
        &self.config
    }

    // Chart of accounts

    /// Create a new account
    pub async fn create_account(&mut self, spec: NewAccount) -> AccountingResult<Account> {
        self.accounts.create_account(spec).await
    }

    /// Update account metadata
    pub async fn update_account(
        &mut self,
        account_id: Uuid,
        patch: AccountPatch,
    ) -> AccountingResult<Account> {
        self.accounts.update_account(account_id, patch).await
    }

    /// Soft-delete an account
    pub async fn deactivate_account(&mut self, account_id: Uuid) -> AccountingResult<Account> {
        self.accounts.deactivate_account(account_id).await
    }

    /// Get an account by id
    pub async fn account(&self, account_id: Uuid) -> AccountingResult<Option<Account>> {
        self.accounts.get_account(account_id).await
    }

    /// Look an account up by its business code
    pub async fn account_by_code(&self, code: &str) -> AccountingResult<Option<Account>> {
        self.accounts.find_account_by_code(code).await
    }

    /// List accounts matching a filter
    pub async fn accounts(&self, filter: &AccountFilter) -> AccountingResult<Vec<Account>> {
        self.accounts.list_accounts(filter).await
    }

    /// An account's live running balance
    pub async fn account_balance(&self, account_id: Uuid) -> AccountingResult<BigDecimal> {
        let account = self.accounts.get_account_required(account_id).await?;
        Ok(account.current_balance)
    }

    /// Whether `node_id` sits in the subtree under `ancestor_id`
    pub async fn is_account_descendant(
        &self,
        ancestor_id: Uuid,
        node_id: Uuid,
    ) -> AccountingResult<bool> {
        self.accounts.is_descendant(ancestor_id, node_id).await
    }

    // Financial years

    /// Create a financial year
    pub async fn create_financial_year(
        &mut self,
        spec: NewFinancialYear,
    ) -> AccountingResult<FinancialYear> {
        self.years.create_year(spec).await
    }

    /// Update a financial year, including status transitions
    pub async fn update_financial_year(
        &mut self,
        year_id: Uuid,
        patch: FinancialYearPatch,
    ) -> AccountingResult<FinancialYear> {
        self.years.update_year(year_id, patch).await
    }

    /// Close a year, stamping who closed it
    pub async fn close_financial_year(
        &mut self,
        year_id: Uuid,
        closed_by: &str,
    ) -> AccountingResult<FinancialYear> {
        self.years.close_year(year_id, closed_by).await
    }

    /// Reopen a closed year
    pub async fn reopen_financial_year(&mut self, year_id: Uuid) -> AccountingResult<FinancialYear> {
        self.years.reopen_year(year_id).await
    }

    /// Delete a financial year that has no journal entries
    pub async fn delete_financial_year(&mut self, year_id: Uuid) -> AccountingResult<()> {
        self.years.delete_year(year_id).await
    }

    /// The year currently flagged as current, if any
    pub async fn current_financial_year(&self) -> AccountingResult<Option<FinancialYear>> {
        self.years.current_year().await
    }

    /// Get a financial year by id
    pub async fn financial_year(&self, year_id: Uuid) -> AccountingResult<Option<FinancialYear>> {
        self.years.get_year(year_id).await
    }

    /// All financial years ordered by start date
    pub async fn financial_years(&self) -> AccountingResult<Vec<FinancialYear>> {
        self.years.list_years().await
    }

    // Journal

    /// Validate and atomically post a journal entry
    pub async fn post_journal_entry(
        &mut self,
        draft: JournalEntryDraft,
    ) -> AccountingResult<JournalEntry> {
        self.journal.post(draft).await
    }

    /// Persist a draft entry without touching balances
    pub async fn save_draft_entry(
        &mut self,
        draft: JournalEntryDraft,
    ) -> AccountingResult<JournalEntry> {
        self.journal.save_draft(draft).await
    }

    /// Promote a stored draft through the full posting validation
    pub async fn post_draft_entry(&mut self, entry_id: Uuid) -> AccountingResult<JournalEntry> {
        self.journal.post_draft(entry_id).await
    }

    /// Reverse a posted entry with an offsetting entry
    pub async fn reverse_entry(
        &mut self,
        entry_id: Uuid,
        reason: &str,
    ) -> AccountingResult<JournalEntry> {
        self.journal.reverse(entry_id, reason).await
    }

    /// Get a journal entry by id
    pub async fn journal_entry(&self, entry_id: Uuid) -> AccountingResult<Option<JournalEntry>> {
        self.journal.get_entry(entry_id).await
    }

    /// Look a journal entry up by its unique number
    pub async fn journal_entry_by_number(
        &self,
        entry_number: &str,
    ) -> AccountingResult<Option<JournalEntry>> {
        self.journal.find_entry_by_number(entry_number).await
    }

    // Read-side projections

    /// Reconstruct one page of an account's ledger
    pub async fn ledger(&self, query: &LedgerQuery) -> AccountingResult<LedgerPage> {
        self.view.ledger(query).await
    }

    /// Generate a trial balance snapshot
    pub async fn trial_balance(
        &self,
        query: &TrialBalanceQuery,
    ) -> AccountingResult<TrialBalanceReport> {
        self.trial_balance.generate(query).await
    }
}
