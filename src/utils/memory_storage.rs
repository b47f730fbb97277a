//! In-memory storage implementation for testing and development

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// Everything the store holds, behind one lock so the compound operations
/// (posting, current-year switch) commit atomically
#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    years: HashMap<Uuid, FinancialYear>,
    entries: HashMap<Uuid, JournalEntry>,
    entry_sequence: u64,
}

/// In-memory [`AccountingStorage`] implementation for tests and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap();
        state.accounts.clear();
        state.years.clear();
        state.entries.clear();
        state.entry_sequence = 0;
    }

    /// Overwrite a stored entry directly, bypassing all JournalLedger
    /// validation. Exists so integrity tests can inject corrupted data.
    pub fn inject_entry_unchecked(&self, entry: JournalEntry) {
        self.state
            .write()
            .unwrap()
            .entries
            .insert(entry.id, entry);
    }
}

#[async_trait]
impl AccountingStorage for MemoryStorage {
    async fn insert_account(&mut self, account: &Account) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();
        if state
            .accounts
            .values()
            .any(|a| a.account_code == account.account_code)
        {
            return Err(AccountingError::DuplicateCode {
                code: account.account_code.clone(),
            });
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, account_id: Uuid) -> AccountingResult<Option<Account>> {
        Ok(self.state.read().unwrap().accounts.get(&account_id).cloned())
    }

    async fn find_account_by_code(&self, code: &str) -> AccountingResult<Option<Account>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .accounts
            .values()
            .find(|a| a.account_code == code)
            .cloned())
    }

    async fn list_accounts(&self, filter: &AccountFilter) -> AccountingResult<Vec<Account>> {
        let state = self.state.read().unwrap();
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| filter.include_inactive || a.is_active)
            .filter(|a| {
                filter
                    .account_type
                    .is_none_or(|t| a.account_type == t)
            })
            .filter(|a| {
                filter
                    .department_id
                    .is_none_or(|d| a.department_id == Some(d))
            })
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.account_code.cmp(&b.account_code));
        Ok(accounts)
    }

    async fn list_child_accounts(&self, parent_id: Uuid) -> AccountingResult<Vec<Account>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .accounts
            .values()
            .filter(|a| a.parent_account_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn update_account(&mut self, account: &Account) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();
        if !state.accounts.contains_key(&account.id) {
            return Err(AccountingError::AccountNotFound {
                account_id: account.id,
            });
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn account_has_postings(&self, account_id: Uuid) -> AccountingResult<bool> {
        Ok(self
            .state
            .read()
            .unwrap()
            .entries
            .values()
            .any(|e| e.items.iter().any(|i| i.account_id == account_id)))
    }

    async fn insert_financial_year(&mut self, year: &FinancialYear) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();
        // clear-old and set-new current happen under the same lock
        if year.is_current {
            for other in state.years.values_mut() {
                other.is_current = false;
            }
        }
        state.years.insert(year.id, year.clone());
        Ok(())
    }

    async fn get_financial_year(&self, year_id: Uuid) -> AccountingResult<Option<FinancialYear>> {
        Ok(self.state.read().unwrap().years.get(&year_id).cloned())
    }

    async fn find_year_by_name(&self, year_name: &str) -> AccountingResult<Option<FinancialYear>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .years
            .values()
            .find(|y| y.year_name == year_name)
            .cloned())
    }

    async fn list_financial_years(&self) -> AccountingResult<Vec<FinancialYear>> {
        let mut years: Vec<FinancialYear> =
            self.state.read().unwrap().years.values().cloned().collect();
        years.sort_by_key(|y| y.start_date);
        Ok(years)
    }

    async fn update_financial_year(&mut self, year: &FinancialYear) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();
        if !state.years.contains_key(&year.id) {
            return Err(AccountingError::YearNotFound { year_id: year.id });
        }
        if year.is_current {
            for other in state.years.values_mut() {
                other.is_current = false;
            }
        }
        state.years.insert(year.id, year.clone());
        Ok(())
    }

    async fn delete_financial_year(&mut self, year_id: Uuid) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();
        if state.years.remove(&year_id).is_none() {
            return Err(AccountingError::YearNotFound { year_id });
        }
        Ok(())
    }

    async fn current_financial_year(&self) -> AccountingResult<Option<FinancialYear>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .years
            .values()
            .find(|y| y.is_current)
            .cloned())
    }

    async fn count_entries(
        &self,
        year_id: Uuid,
        status: Option<EntryStatus>,
    ) -> AccountingResult<u64> {
        Ok(self
            .state
            .read()
            .unwrap()
            .entries
            .values()
            .filter(|e| e.financial_year_id == year_id)
            .filter(|e| status.is_none_or(|s| e.status == s))
            .count() as u64)
    }

    async fn next_entry_sequence(&mut self) -> AccountingResult<u64> {
        let mut state = self.state.write().unwrap();
        state.entry_sequence += 1;
        Ok(state.entry_sequence)
    }

    async fn insert_journal_entry(&mut self, entry: &JournalEntry) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();
        if state
            .entries
            .values()
            .any(|e| e.id != entry.id && e.entry_number == entry.entry_number)
        {
            return Err(AccountingError::DuplicateEntryNumber {
                entry_number: entry.entry_number.clone(),
            });
        }
        state.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn get_journal_entry(&self, entry_id: Uuid) -> AccountingResult<Option<JournalEntry>> {
        Ok(self.state.read().unwrap().entries.get(&entry_id).cloned())
    }

    async fn find_entry_by_number(
        &self,
        entry_number: &str,
    ) -> AccountingResult<Option<JournalEntry>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .entries
            .values()
            .find(|e| e.entry_number == entry_number)
            .cloned())
    }

    async fn apply_posting(
        &mut self,
        entry: &JournalEntry,
        deltas: &[BalanceDelta],
        reverses: Option<Uuid>,
    ) -> AccountingResult<()> {
        let mut state = self.state.write().unwrap();

        // validate everything before the first mutation so the unit stays
        // all-or-nothing under the single lock
        if state
            .entries
            .values()
            .any(|e| e.id != entry.id && e.entry_number == entry.entry_number)
        {
            return Err(AccountingError::DuplicateEntryNumber {
                entry_number: entry.entry_number.clone(),
            });
        }
        for delta in deltas {
            if !state.accounts.contains_key(&delta.account_id) {
                return Err(AccountingError::AccountNotFound {
                    account_id: delta.account_id,
                });
            }
        }
        if let Some(original_id) = reverses {
            if !state.entries.contains_key(&original_id) {
                return Err(AccountingError::EntryNotFound {
                    entry_id: original_id,
                });
            }
        }

        state.entries.insert(entry.id, entry.clone());
        let now = chrono::Utc::now().naive_utc();
        for delta in deltas {
            let account = state
                .accounts
                .get_mut(&delta.account_id)
                .expect("account checked above");
            account.current_balance += &delta.delta;
            account.updated_at = now;
        }
        if let Some(original_id) = reverses {
            let original = state
                .entries
                .get_mut(&original_id)
                .expect("entry checked above");
            original.reversed_by = Some(entry.id);
        }

        Ok(())
    }

    async fn list_posted_entries_for_account(
        &self,
        account_id: Uuid,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> AccountingResult<Vec<JournalEntry>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .entries
            .values()
            .filter(|e| e.status == EntryStatus::Posted)
            .filter(|e| e.items.iter().any(|i| i.account_id == account_id))
            .filter(|e| from_date.is_none_or(|from| e.entry_date >= from))
            .filter(|e| to_date.is_none_or(|to| e.entry_date <= to))
            .cloned()
            .collect())
    }

    async fn list_posted_entries(
        &self,
        year_id: Uuid,
        to_date: Option<NaiveDate>,
    ) -> AccountingResult<Vec<JournalEntry>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .entries
            .values()
            .filter(|e| e.status == EntryStatus::Posted)
            .filter(|e| e.financial_year_id == year_id)
            .filter(|e| to_date.is_none_or(|to| e.entry_date <= to))
            .cloned()
            .collect())
    }
}
