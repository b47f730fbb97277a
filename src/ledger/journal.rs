//! Journal posting: validation and atomic application of balanced entries

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AccountingConfig;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Reference type stamped on reversal entries
pub const REVERSAL_REFERENCE_TYPE: &str = "REVERSAL";

/// An entry as submitted by a business-workflow caller, before it has an
/// id, number, or status
#[derive(Debug, Clone)]
pub struct JournalEntryDraft {
    /// Caller-supplied number for idempotent retries; generated from the
    /// storage sequence when absent
    pub entry_number: Option<String>,
    pub entry_date: NaiveDate,
    /// Resolved to the current financial year when absent
    pub financial_year_id: Option<Uuid>,
    pub reference: Option<String>,
    pub reference_type: Option<String>,
    pub description: Option<String>,
    pub items: Vec<JournalEntryItem>,
}

/// Builder for journal entry drafts
#[derive(Debug)]
pub struct JournalEntryBuilder {
    draft: JournalEntryDraft,
}

impl JournalEntryBuilder {
    pub fn new(entry_date: NaiveDate, description: &str) -> Self {
        Self {
            draft: JournalEntryDraft {
                entry_number: None,
                entry_date,
                financial_year_id: None,
                reference: None,
                reference_type: None,
                description: Some(description.to_string()),
                items: Vec::new(),
            },
        }
    }

    /// Pin the entry to a specific financial year instead of the current one
    pub fn financial_year(mut self, year_id: Uuid) -> Self {
        self.draft.financial_year_id = Some(year_id);
        self
    }

    /// Supply the entry number instead of drawing one from the sequence
    pub fn entry_number(mut self, entry_number: &str) -> Self {
        self.draft.entry_number = Some(entry_number.to_string());
        self
    }

    /// Link to the originating business document
    pub fn reference(mut self, reference: &str, reference_type: &str) -> Self {
        self.draft.reference = Some(reference.to_string());
        self.draft.reference_type = Some(reference_type.to_string());
        self
    }

    /// Add a debit line
    pub fn debit(mut self, account_id: Uuid, amount: BigDecimal) -> Self {
        self.draft
            .items
            .push(JournalEntryItem::debit(account_id, amount, None));
        self
    }

    /// Add a credit line
    pub fn credit(mut self, account_id: Uuid, amount: BigDecimal) -> Self {
        self.draft
            .items
            .push(JournalEntryItem::credit(account_id, amount, None));
        self
    }

    /// Add a custom line
    pub fn item(mut self, item: JournalEntryItem) -> Self {
        self.draft.items.push(item);
        self
    }

    /// Validate line shape and balance, and return the draft
    pub fn build(self) -> AccountingResult<JournalEntryDraft> {
        validate_item_shape(&self.draft.items)?;
        validate_balance(&self.draft.items)?;
        Ok(self.draft)
    }
}

/// Validates and atomically posts balanced journal entries against open
/// financial years and active accounts
pub struct JournalLedger<S: AccountingStorage> {
    pub(crate) storage: S,
    config: AccountingConfig,
}

impl<S: AccountingStorage> JournalLedger<S> {
    pub fn new(storage: S, config: AccountingConfig) -> Self {
        Self { storage, config }
    }

    /// Validate a draft and post it.
    ///
    /// On success the entry write and every account balance adjustment
    /// commit as one storage transaction; on any rejection nothing is
    /// mutated.
    pub async fn post(&mut self, draft: JournalEntryDraft) -> AccountingResult<JournalEntry> {
        validate_item_shape(&draft.items)?;
        validate_balance(&draft.items)?;

        let year = self.resolve_year(draft.financial_year_id).await?;
        ensure_postable(&year, draft.entry_date)?;
        let deltas = self.posting_deltas(&draft.items).await?;
        let entry_number = self.resolve_entry_number(draft.entry_number.clone()).await?;

        let now = chrono::Utc::now().naive_utc();
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            entry_number,
            entry_date: draft.entry_date,
            financial_year_id: year.id,
            reference: draft.reference,
            reference_type: draft.reference_type,
            description: draft.description,
            status: EntryStatus::Posted,
            reversed_by: None,
            items: draft.items,
            created_at: now,
            posted_at: Some(now),
        };

        self.storage.apply_posting(&entry, &deltas, None).await?;
        debug!(
            entry_number = %entry.entry_number,
            total = %entry.total_debits(),
            "journal entry posted"
        );

        Ok(entry)
    }

    /// Persist a draft entry without touching balances.
    ///
    /// Drafts are held to the structural rules (line shape, known
    /// accounts, date inside the year) but may be unbalanced until they
    /// are posted.
    pub async fn save_draft(&mut self, draft: JournalEntryDraft) -> AccountingResult<JournalEntry> {
        validate_item_shape(&draft.items)?;

        let year = self.resolve_year(draft.financial_year_id).await?;
        if !year.contains(draft.entry_date) {
            return Err(AccountingError::DateOutOfPeriod {
                date: draft.entry_date,
                year_name: year.year_name,
                start: year.start_date,
                end: year.end_date,
            });
        }
        for item in &draft.items {
            self.get_account_required(item.account_id).await?;
        }

        let entry_number = self.resolve_entry_number(draft.entry_number.clone()).await?;
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            entry_number,
            entry_date: draft.entry_date,
            financial_year_id: year.id,
            reference: draft.reference,
            reference_type: draft.reference_type,
            description: draft.description,
            status: EntryStatus::Draft,
            reversed_by: None,
            items: draft.items,
            created_at: chrono::Utc::now().naive_utc(),
            posted_at: None,
        };

        self.storage.insert_journal_entry(&entry).await?;
        debug!(entry_number = %entry.entry_number, "journal draft saved");

        Ok(entry)
    }

    /// Promote a stored draft through the full posting validation
    pub async fn post_draft(&mut self, entry_id: Uuid) -> AccountingResult<JournalEntry> {
        let draft = self.get_entry_required(entry_id).await?;
        if draft.status != EntryStatus::Draft {
            return Err(AccountingError::AlreadyPosted {
                entry_number: draft.entry_number,
            });
        }

        validate_item_shape(&draft.items)?;
        validate_balance(&draft.items)?;
        let year = self.resolve_year(Some(draft.financial_year_id)).await?;
        ensure_postable(&year, draft.entry_date)?;
        let deltas = self.posting_deltas(&draft.items).await?;

        let mut entry = draft;
        entry.status = EntryStatus::Posted;
        entry.posted_at = Some(chrono::Utc::now().naive_utc());

        self.storage.apply_posting(&entry, &deltas, None).await?;
        debug!(entry_number = %entry.entry_number, "journal draft posted");

        Ok(entry)
    }

    /// Reverse a posted entry with an offsetting entry.
    ///
    /// Every line's debit and credit are swapped; the reversal carries the
    /// original's date and year and runs through the full posting
    /// validation, so reversing into a closed period is rejected. The
    /// original entry is never amount-mutated; it gains a `reversed_by`
    /// link in the same transaction.
    pub async fn reverse(&mut self, entry_id: Uuid, reason: &str) -> AccountingResult<JournalEntry> {
        let original = self.get_entry_required(entry_id).await?;
        if original.status != EntryStatus::Posted {
            return Err(AccountingError::EntryNotPosted {
                entry_number: original.entry_number,
            });
        }
        if let Some(reversed_by) = original.reversed_by {
            return Err(AccountingError::AlreadyReversed {
                entry_number: original.entry_number,
                reversed_by,
            });
        }

        let year = self.resolve_year(Some(original.financial_year_id)).await?;
        ensure_postable(&year, original.entry_date)?;

        let items: Vec<JournalEntryItem> = original
            .items
            .iter()
            .map(|item| JournalEntryItem {
                account_id: item.account_id,
                debit_amount: item.credit_amount.clone(),
                credit_amount: item.debit_amount.clone(),
                description: item.description.clone(),
            })
            .collect();
        let deltas = self.posting_deltas(&items).await?;

        let now = chrono::Utc::now().naive_utc();
        let reversal = JournalEntry {
            id: Uuid::new_v4(),
            entry_number: self.resolve_entry_number(None).await?,
            entry_date: original.entry_date,
            financial_year_id: original.financial_year_id,
            reference: Some(original.entry_number.clone()),
            reference_type: Some(REVERSAL_REFERENCE_TYPE.to_string()),
            description: Some(reason.to_string()),
            status: EntryStatus::Posted,
            reversed_by: None,
            items,
            created_at: now,
            posted_at: Some(now),
        };

        self.storage
            .apply_posting(&reversal, &deltas, Some(original.id))
            .await?;
        warn!(
            entry_number = %original.entry_number,
            reversal = %reversal.entry_number,
            reason,
            "journal entry reversed"
        );

        Ok(reversal)
    }

    /// Get an entry by id
    pub async fn get_entry(&self, entry_id: Uuid) -> AccountingResult<Option<JournalEntry>> {
        self.storage.get_journal_entry(entry_id).await
    }

    /// Get an entry by id, returning an error if not found
    pub async fn get_entry_required(&self, entry_id: Uuid) -> AccountingResult<JournalEntry> {
        self.storage
            .get_journal_entry(entry_id)
            .await?
            .ok_or(AccountingError::EntryNotFound { entry_id })
    }

    /// Look an entry up by its unique number
    pub async fn find_entry_by_number(
        &self,
        entry_number: &str,
    ) -> AccountingResult<Option<JournalEntry>> {
        self.storage.find_entry_by_number(entry_number).await
    }

    async fn resolve_year(&self, year_id: Option<Uuid>) -> AccountingResult<FinancialYear> {
        match year_id {
            Some(year_id) => self
                .storage
                .get_financial_year(year_id)
                .await?
                .ok_or(AccountingError::YearNotFound { year_id }),
            None => self
                .storage
                .current_financial_year()
                .await?
                .ok_or(AccountingError::NoCurrentYear),
        }
    }

    async fn get_account_required(&self, account_id: Uuid) -> AccountingResult<Account> {
        self.storage
            .get_account(account_id)
            .await?
            .ok_or(AccountingError::AccountNotFound { account_id })
    }

    /// Load and check every referenced account, then aggregate the
    /// type-aware balance change per account. Deltas come back sorted by
    /// ascending account id so locking backends acquire row locks in a
    /// deadlock-free order.
    async fn posting_deltas(
        &self,
        items: &[JournalEntryItem],
    ) -> AccountingResult<Vec<BalanceDelta>> {
        let mut accounts: HashMap<Uuid, Account> = HashMap::new();
        for item in items {
            if !accounts.contains_key(&item.account_id) {
                let account = self.get_account_required(item.account_id).await?;
                if !account.is_active {
                    return Err(AccountingError::InactiveAccount {
                        account_id: account.id,
                        account_code: account.account_code,
                    });
                }
                accounts.insert(account.id, account);
            }
        }

        let mut totals: HashMap<Uuid, BigDecimal> = HashMap::new();
        for item in items {
            let account = &accounts[&item.account_id];
            let delta = account.balance_delta(&item.debit_amount, &item.credit_amount);
            *totals.entry(item.account_id).or_insert_with(|| BigDecimal::from(0)) += delta;
        }

        let mut deltas: Vec<BalanceDelta> = totals
            .into_iter()
            .map(|(account_id, delta)| BalanceDelta { account_id, delta })
            .collect();
        deltas.sort_by_key(|d| d.account_id);

        Ok(deltas)
    }

    async fn resolve_entry_number(
        &mut self,
        requested: Option<String>,
    ) -> AccountingResult<String> {
        match requested {
            Some(entry_number) => {
                validation::validate_entry_number(&entry_number)?;
                if self
                    .storage
                    .find_entry_by_number(&entry_number)
                    .await?
                    .is_some()
                {
                    return Err(AccountingError::DuplicateEntryNumber { entry_number });
                }
                Ok(entry_number)
            }
            None => {
                let sequence = self.storage.next_entry_sequence().await?;
                Ok(format!(
                    "{}-{:06}",
                    self.config.entry_number_prefix, sequence
                ))
            }
        }
    }
}

/// Structural checks on entry lines: at least two, every amount
/// non-negative, and exactly one side of each line carrying value
fn validate_item_shape(items: &[JournalEntryItem]) -> AccountingResult<()> {
    if items.len() < 2 {
        return Err(AccountingError::Validation(
            "journal entry must have at least two lines for double-entry bookkeeping".to_string(),
        ));
    }

    let zero = BigDecimal::from(0);
    for item in items {
        validation::validate_non_negative_amount(&item.debit_amount)?;
        validation::validate_non_negative_amount(&item.credit_amount)?;
        if item.debit_amount == zero && item.credit_amount == zero {
            return Err(AccountingError::Validation(
                "journal entry line must carry a debit or a credit amount".to_string(),
            ));
        }
        if item.debit_amount > zero && item.credit_amount > zero {
            return Err(AccountingError::Validation(
                "journal entry line cannot carry both a debit and a credit amount".to_string(),
            ));
        }
    }

    Ok(())
}

/// Exact balance check: debits must equal credits, no tolerance
fn validate_balance(items: &[JournalEntryItem]) -> AccountingResult<()> {
    let debits: BigDecimal = items.iter().map(|i| &i.debit_amount).sum();
    let credits: BigDecimal = items.iter().map(|i| &i.credit_amount).sum();
    if debits != credits {
        return Err(AccountingError::Unbalanced { debits, credits });
    }
    Ok(())
}

/// The fiscal-period gate every posting passes: year open, date in bounds
fn ensure_postable(year: &FinancialYear, entry_date: NaiveDate) -> AccountingResult<()> {
    if year.status != YearStatus::Active {
        return Err(AccountingError::PeriodClosed {
            year_name: year.year_name.clone(),
        });
    }
    if !year.contains(entry_date) {
        return Err(AccountingError::DateOutOfPeriod {
            date: entry_date,
            year_name: year.year_name.clone(),
            start: year.start_date,
            end: year.end_date,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn builder_rejects_unbalanced_drafts() {
        let cash = Uuid::new_v4();
        let revenue = Uuid::new_v4();

        let result = JournalEntryBuilder::new(date(2024, 3, 1), "Consultation fee")
            .debit(cash, BigDecimal::from(500))
            .credit(revenue, BigDecimal::from(400))
            .build();

        assert!(matches!(
            result,
            Err(AccountingError::Unbalanced { ref debits, ref credits })
                if *debits == BigDecimal::from(500) && *credits == BigDecimal::from(400)
        ));
    }

    #[test]
    fn builder_rejects_single_sided_entries() {
        let cash = Uuid::new_v4();
        let result = JournalEntryBuilder::new(date(2024, 3, 1), "Half an entry")
            .debit(cash, BigDecimal::from(100))
            .build();
        assert!(matches!(result, Err(AccountingError::Validation(_))));
    }

    #[test]
    fn lines_cannot_carry_both_sides() {
        let items = vec![
            JournalEntryItem {
                account_id: Uuid::new_v4(),
                debit_amount: BigDecimal::from(10),
                credit_amount: BigDecimal::from(10),
                description: None,
            },
            JournalEntryItem::credit(Uuid::new_v4(), BigDecimal::from(10), None),
        ];
        assert!(matches!(
            validate_item_shape(&items),
            Err(AccountingError::Validation(_))
        ));
    }
}
