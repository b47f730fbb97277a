//! Point-in-time trial balance generation

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::AccountingConfig;
use crate::traits::*;
use crate::types::*;

/// Typed query for a trial balance snapshot
#[derive(Debug, Clone)]
pub struct TrialBalanceQuery {
    pub financial_year_id: Uuid,
    /// Snapshot date; must fall inside the financial year
    pub as_of_date: NaiveDate,
    /// Drop rows whose balance is zero
    pub exclude_zero: bool,
    /// Group rows by account type with per-group subtotals
    pub group_by_type: bool,
}

impl TrialBalanceQuery {
    pub fn new(financial_year_id: Uuid, as_of_date: NaiveDate) -> Self {
        Self {
            financial_year_id,
            as_of_date,
            exclude_zero: false,
            group_by_type: false,
        }
    }

    pub fn exclude_zero(mut self) -> Self {
        self.exclude_zero = true;
        self
    }

    pub fn group_by_type(mut self) -> Self {
        self.group_by_type = true;
        self
    }
}

/// Fixed presentation order for grouped reports
const TYPE_ORDER: [AccountType; 5] = [
    AccountType::Asset,
    AccountType::Liability,
    AccountType::Equity,
    AccountType::Revenue,
    AccountType::Expense,
];

/// Read-side projection computing a trial balance across all active
/// accounts as of a date
pub struct TrialBalanceGenerator<S: AccountingStorage> {
    pub(crate) storage: S,
    config: AccountingConfig,
}

impl<S: AccountingStorage> TrialBalanceGenerator<S> {
    pub fn new(storage: S, config: AccountingConfig) -> Self {
        Self { storage, config }
    }

    /// Generate the trial balance for a year as of a date.
    ///
    /// Each active account's balance is its opening balance plus the
    /// type-aware net of posted activity up to the as-of date. Column
    /// placement follows the normal side: a debit-normal account's
    /// positive balance lands in the debit column and a negative one in
    /// the credit column as an absolute value, and symmetrically for
    /// credit-normal accounts. A residual beyond the configured tolerance
    /// marks the report unbalanced; it is never coerced into balance.
    pub async fn generate(&self, query: &TrialBalanceQuery) -> AccountingResult<TrialBalanceReport> {
        let year = self
            .storage
            .get_financial_year(query.financial_year_id)
            .await?
            .ok_or(AccountingError::YearNotFound {
                year_id: query.financial_year_id,
            })?;
        if !year.contains(query.as_of_date) {
            return Err(AccountingError::DateOutOfPeriod {
                date: query.as_of_date,
                year_name: year.year_name,
                start: year.start_date,
                end: year.end_date,
            });
        }

        let mut accounts = self
            .storage
            .list_accounts(&AccountFilter::default())
            .await?;
        accounts.sort_by(|a, b| a.account_code.cmp(&b.account_code));

        let entries = self
            .storage
            .list_posted_entries(year.id, Some(query.as_of_date))
            .await?;
        let mut activity: HashMap<Uuid, (BigDecimal, BigDecimal)> = HashMap::new();
        for entry in &entries {
            for item in &entry.items {
                let sums = activity
                    .entry(item.account_id)
                    .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
                sums.0 += &item.debit_amount;
                sums.1 += &item.credit_amount;
            }
        }

        let zero = BigDecimal::from(0);
        let mut rows: Vec<TrialBalanceRow> = Vec::new();
        let mut total_debits = BigDecimal::from(0);
        let mut total_credits = BigDecimal::from(0);
        for account in accounts {
            let (debits, credits) = activity
                .get(&account.id)
                .cloned()
                .unwrap_or_else(|| (zero.clone(), zero.clone()));
            let balance = &account.opening_balance + account.balance_delta(&debits, &credits);

            let (debit_balance, credit_balance) = match account.account_type.normal_side() {
                BalanceSide::Debit => {
                    if balance >= zero {
                        (Some(balance.clone()), None)
                    } else {
                        (None, Some(balance.abs()))
                    }
                }
                BalanceSide::Credit => {
                    if balance >= zero {
                        (None, Some(balance.clone()))
                    } else {
                        (Some(balance.abs()), None)
                    }
                }
            };

            if let Some(ref debit) = debit_balance {
                total_debits += debit;
            }
            if let Some(ref credit) = credit_balance {
                total_credits += credit;
            }

            if query.exclude_zero && balance == zero {
                continue;
            }

            rows.push(TrialBalanceRow {
                account_id: account.id,
                account_code: account.account_code,
                account_name: account.account_name,
                account_type: account.account_type,
                opening_balance: account.opening_balance,
                total_debits: debits,
                total_credits: credits,
                balance,
                debit_balance,
                credit_balance,
            });
        }

        let groups = if query.group_by_type {
            Some(group_rows(&rows))
        } else {
            None
        };

        let residual = (&total_debits - &total_credits).abs();
        let is_balanced = residual < self.config.balance_tolerance;
        if !is_balanced {
            // not rounding noise: the books themselves are inconsistent
            error!(
                year_name = %year.year_name,
                as_of = %query.as_of_date,
                total_debits = %total_debits,
                total_credits = %total_credits,
                residual = %residual,
                "trial balance out of tolerance; data-integrity violation"
            );
        } else if residual != zero {
            warn!(
                year_name = %year.year_name,
                as_of = %query.as_of_date,
                residual = %residual,
                "trial balance carries a rounding residual within tolerance"
            );
        }

        Ok(TrialBalanceReport {
            financial_year_id: year.id,
            as_of_date: query.as_of_date,
            rows,
            groups,
            total_debits,
            total_credits,
            is_balanced,
        })
    }
}

fn group_rows(rows: &[TrialBalanceRow]) -> Vec<TrialBalanceGroup> {
    TYPE_ORDER
        .iter()
        .filter_map(|account_type| {
            let group_rows: Vec<TrialBalanceRow> = rows
                .iter()
                .filter(|row| row.account_type == *account_type)
                .cloned()
                .collect();
            if group_rows.is_empty() {
                return None;
            }
            let subtotal_debits: BigDecimal = group_rows
                .iter()
                .filter_map(|row| row.debit_balance.as_ref())
                .sum();
            let subtotal_credits: BigDecimal = group_rows
                .iter()
                .filter_map(|row| row.credit_balance.as_ref())
                .sum();
            Some(TrialBalanceGroup {
                account_type: *account_type,
                rows: group_rows,
                subtotal_debits,
                subtotal_credits,
            })
        })
        .collect()
}
