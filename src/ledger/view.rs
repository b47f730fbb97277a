//! Per-account ledger reconstruction with running balances

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// Default page size for ledger pages
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Typed query for one account's ledger window
#[derive(Debug, Clone)]
pub struct LedgerQuery {
    pub account_id: Uuid,
    /// Clamp the window to a financial year's bounds
    pub financial_year_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl LedgerQuery {
    pub fn for_account(account_id: Uuid) -> Self {
        Self {
            account_id,
            financial_year_id: None,
            from_date: None,
            to_date: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn in_year(mut self, year_id: Uuid) -> Self {
        self.financial_year_id = Some(year_id);
        self
    }

    pub fn between(mut self, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        self.from_date = Some(from_date);
        self.to_date = Some(to_date);
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// Read-side projection reconstructing an account's chronological ledger
/// from posted journal entries
pub struct LedgerView<S: AccountingStorage> {
    pub(crate) storage: S,
}

impl<S: AccountingStorage> LedgerView<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Reconstruct one page of an account's ledger.
    ///
    /// The opening balance is the account's opening balance plus the
    /// type-aware net of every posted item dated strictly before the
    /// window; rows within the window are ordered by entry date with the
    /// entry number as a deterministic tie-break. Page one is prefixed
    /// with the synthetic opening-balance row; later pages replay the
    /// items before their slice so the running balance stays correct.
    pub async fn ledger(&self, query: &LedgerQuery) -> AccountingResult<LedgerPage> {
        if query.page == 0 || query.page_size == 0 {
            return Err(AccountingError::Validation(
                "page and page_size must be at least 1".to_string(),
            ));
        }
        if let (Some(from), Some(to)) = (query.from_date, query.to_date) {
            if from > to {
                return Err(AccountingError::InvalidRange {
                    start: from,
                    end: to,
                });
            }
        }

        let account = self
            .storage
            .get_account(query.account_id)
            .await?
            .ok_or(AccountingError::AccountNotFound {
                account_id: query.account_id,
            })?;

        // effective window, clamped to the year when one is given
        let (window_start, window_end) = match query.financial_year_id {
            Some(year_id) => {
                let year = self
                    .storage
                    .get_financial_year(year_id)
                    .await?
                    .ok_or(AccountingError::YearNotFound { year_id })?;
                let start = match query.from_date {
                    Some(from) => from.max(year.start_date),
                    None => year.start_date,
                };
                let end = match query.to_date {
                    Some(to) => to.min(year.end_date),
                    None => year.end_date,
                };
                (Some(start), Some(end))
            }
            None => (query.from_date, query.to_date),
        };

        let opening_balance = match window_start.and_then(|start| start.pred_opt()) {
            Some(cutoff) => {
                let prior = self
                    .storage
                    .list_posted_entries_for_account(account.id, None, Some(cutoff))
                    .await?;
                let net: BigDecimal = prior
                    .iter()
                    .flat_map(|entry| entry.items.iter())
                    .filter(|item| item.account_id == account.id)
                    .map(|item| account.balance_delta(&item.debit_amount, &item.credit_amount))
                    .sum();
                &account.opening_balance + net
            }
            None => account.opening_balance.clone(),
        };

        let mut entries = self
            .storage
            .list_posted_entries_for_account(account.id, window_start, window_end)
            .await?;
        entries.sort_by(|a, b| {
            a.entry_date
                .cmp(&b.entry_date)
                .then_with(|| a.entry_number.cmp(&b.entry_number))
        });

        let mut all_rows: Vec<LedgerRow> = Vec::new();
        let mut running = opening_balance.clone();
        let mut total_debits = BigDecimal::from(0);
        let mut total_credits = BigDecimal::from(0);
        for entry in &entries {
            for item in entry.items.iter().filter(|i| i.account_id == account.id) {
                running += account.balance_delta(&item.debit_amount, &item.credit_amount);
                total_debits += &item.debit_amount;
                total_credits += &item.credit_amount;
                all_rows.push(LedgerRow {
                    entry_id: Some(entry.id),
                    entry_number: Some(entry.entry_number.clone()),
                    entry_date: Some(entry.entry_date),
                    description: item
                        .description
                        .clone()
                        .or_else(|| entry.description.clone()),
                    reference: entry.reference.clone(),
                    debit_amount: item.debit_amount.clone(),
                    credit_amount: item.credit_amount.clone(),
                    running_balance: running.clone(),
                });
            }
        }

        let closing_balance = running;
        let total_rows = all_rows.len() as u64;
        let page_size = query.page_size as usize;
        let total_pages = (all_rows.len().div_ceil(page_size)).max(1) as u32;

        let offset = (query.page as usize - 1) * page_size;
        let mut rows: Vec<LedgerRow> = all_rows
            .into_iter()
            .skip(offset)
            .take(page_size)
            .collect();
        if query.page == 1 {
            rows.insert(0, LedgerRow::opening(opening_balance.clone()));
        }

        Ok(LedgerPage {
            account_id: account.id,
            account_code: account.account_code,
            account_name: account.account_name,
            opening_balance,
            rows,
            page: query.page,
            page_size: query.page_size,
            total_rows,
            total_pages,
            total_debits,
            total_credits,
            closing_balance,
        })
    }
}
