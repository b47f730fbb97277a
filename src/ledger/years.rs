//! Financial-year lifecycle management

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Specification for a new financial year
#[derive(Debug, Clone)]
pub struct NewFinancialYear {
    pub year_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
}

impl NewFinancialYear {
    pub fn new(year_name: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            year_name: year_name.to_string(),
            start_date,
            end_date,
            is_current: false,
        }
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }
}

/// Partial update of a financial year
#[derive(Debug, Clone, Default)]
pub struct FinancialYearPatch {
    pub year_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<YearStatus>,
    pub is_current: Option<bool>,
    /// Actor stamped as `closed_by` on an Active -> Closed transition
    pub closed_by: Option<String>,
}

/// Manager owning the set of fiscal periods, their open/closed state, and
/// the single "current" period
pub struct FinancialYearManager<S: AccountingStorage> {
    pub(crate) storage: S,
}

impl<S: AccountingStorage> FinancialYearManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a financial year. When `is_current` is set, the previous
    /// current year's flag is cleared inside the same storage transaction.
    pub async fn create_year(&mut self, spec: NewFinancialYear) -> AccountingResult<FinancialYear> {
        validation::validate_year_name(&spec.year_name)?;

        if spec.start_date >= spec.end_date {
            return Err(AccountingError::InvalidRange {
                start: spec.start_date,
                end: spec.end_date,
            });
        }

        if self
            .storage
            .find_year_by_name(&spec.year_name)
            .await?
            .is_some()
        {
            return Err(AccountingError::DuplicateYearName {
                year_name: spec.year_name,
            });
        }

        self.check_overlap(spec.start_date, spec.end_date, None).await?;

        let year = FinancialYear {
            id: Uuid::new_v4(),
            year_name: spec.year_name,
            start_date: spec.start_date,
            end_date: spec.end_date,
            status: YearStatus::Active,
            is_current: spec.is_current,
            closed_by: None,
            closed_at: None,
            created_at: chrono::Utc::now().naive_utc(),
        };

        self.storage.insert_financial_year(&year).await?;
        debug!(year_name = %year.year_name, year_id = %year.id, "financial year created");

        Ok(year)
    }

    /// Update a financial year.
    ///
    /// Status transitions enforce the closing-order rules: a year closes
    /// only with zero draft entries, and a closed year reopens only while
    /// no strictly-later year is closed.
    pub async fn update_year(
        &mut self,
        year_id: Uuid,
        patch: FinancialYearPatch,
    ) -> AccountingResult<FinancialYear> {
        let mut year = self.get_year_required(year_id).await?;

        if let Some(name) = patch.year_name {
            if name != year.year_name {
                validation::validate_year_name(&name)?;
                if self.storage.find_year_by_name(&name).await?.is_some() {
                    return Err(AccountingError::DuplicateYearName { year_name: name });
                }
                year.year_name = name;
            }
        }

        let start = patch.start_date.unwrap_or(year.start_date);
        let end = patch.end_date.unwrap_or(year.end_date);
        if start >= end {
            return Err(AccountingError::InvalidRange { start, end });
        }
        if start != year.start_date || end != year.end_date {
            self.check_overlap(start, end, Some(year_id)).await?;
            year.start_date = start;
            year.end_date = end;
        }

        match (year.status, patch.status) {
            (YearStatus::Active, Some(YearStatus::Closed)) => {
                let draft_count = self
                    .storage
                    .count_entries(year_id, Some(EntryStatus::Draft))
                    .await?;
                if draft_count > 0 {
                    return Err(AccountingError::OpenDraftEntries {
                        year_name: year.year_name,
                        draft_count,
                    });
                }
                year.status = YearStatus::Closed;
                year.closed_by = patch.closed_by;
                year.closed_at = Some(chrono::Utc::now().naive_utc());
                info!(year_name = %year.year_name, "financial year closed");
            }
            (YearStatus::Closed, Some(YearStatus::Active)) => {
                // periods reopen in reverse temporal order: a year stays
                // closed while any strictly-later year is closed
                let years = self.storage.list_financial_years().await?;
                if let Some(later) = years.iter().find(|y| {
                    y.id != year_id
                        && y.status == YearStatus::Closed
                        && y.start_date > year.end_date
                }) {
                    return Err(AccountingError::NewerYearClosed {
                        year_name: year.year_name,
                        closed_year: later.year_name.clone(),
                    });
                }
                year.status = YearStatus::Active;
                year.closed_by = None;
                year.closed_at = None;
                info!(year_name = %year.year_name, "financial year reopened");
            }
            _ => {}
        }

        if let Some(is_current) = patch.is_current {
            year.is_current = is_current;
        }

        self.storage.update_financial_year(&year).await?;
        debug!(year_name = %year.year_name, year_id = %year.id, "financial year updated");

        Ok(year)
    }

    /// Close a year, stamping who closed it
    pub async fn close_year(
        &mut self,
        year_id: Uuid,
        closed_by: &str,
    ) -> AccountingResult<FinancialYear> {
        self.update_year(
            year_id,
            FinancialYearPatch {
                status: Some(YearStatus::Closed),
                closed_by: Some(closed_by.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    /// Reopen a closed year
    pub async fn reopen_year(&mut self, year_id: Uuid) -> AccountingResult<FinancialYear> {
        self.update_year(
            year_id,
            FinancialYearPatch {
                status: Some(YearStatus::Active),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a financial year that has no journal entries
    pub async fn delete_year(&mut self, year_id: Uuid) -> AccountingResult<()> {
        let year = self.get_year_required(year_id).await?;

        let entry_count = self.storage.count_entries(year_id, None).await?;
        if entry_count > 0 {
            return Err(AccountingError::HasEntries {
                year_name: year.year_name,
            });
        }

        self.storage.delete_financial_year(year_id).await?;
        debug!(year_name = %year.year_name, year_id = %year_id, "financial year deleted");

        Ok(())
    }

    /// The year currently flagged as current, if any
    pub async fn current_year(&self) -> AccountingResult<Option<FinancialYear>> {
        self.storage.current_financial_year().await
    }

    /// The current year, or an error when none is flagged
    pub async fn current_year_required(&self) -> AccountingResult<FinancialYear> {
        self.current_year()
            .await?
            .ok_or(AccountingError::NoCurrentYear)
    }

    /// Get a year by id
    pub async fn get_year(&self, year_id: Uuid) -> AccountingResult<Option<FinancialYear>> {
        self.storage.get_financial_year(year_id).await
    }

    /// Get a year by id, returning an error if not found
    pub async fn get_year_required(&self, year_id: Uuid) -> AccountingResult<FinancialYear> {
        self.storage
            .get_financial_year(year_id)
            .await?
            .ok_or(AccountingError::YearNotFound { year_id })
    }

    /// All years ordered by start date
    pub async fn list_years(&self) -> AccountingResult<Vec<FinancialYear>> {
        self.storage.list_financial_years().await
    }

    /// Three-way interval test against every other year: a new range is
    /// rejected when its start or end falls inside an existing year, or
    /// when it encloses one.
    async fn check_overlap(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Uuid>,
    ) -> AccountingResult<()> {
        let years = self.storage.list_financial_years().await?;
        for other in years {
            if Some(other.id) == exclude {
                continue;
            }
            if other.overlaps(start, end) {
                return Err(AccountingError::OverlappingPeriod {
                    start,
                    end,
                    conflicting_year: other.year_name,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manager() -> FinancialYearManager<MemoryStorage> {
        FinancialYearManager::new(MemoryStorage::new())
    }

    #[tokio::test]
    async fn rejects_overlapping_years() {
        let mut manager = manager();
        manager
            .create_year(NewFinancialYear::new(
                "FY 2024",
                date(2024, 1, 1),
                date(2024, 12, 31),
            ))
            .await
            .unwrap();

        let result = manager
            .create_year(NewFinancialYear::new(
                "FY 2024-25",
                date(2024, 6, 1),
                date(2025, 5, 31),
            ))
            .await;

        assert!(matches!(
            result,
            Err(AccountingError::OverlappingPeriod { ref conflicting_year, .. })
                if conflicting_year == "FY 2024"
        ));
    }

    #[tokio::test]
    async fn rejects_inverted_range() {
        let mut manager = manager();
        let result = manager
            .create_year(NewFinancialYear::new(
                "FY 2024",
                date(2024, 12, 31),
                date(2024, 1, 1),
            ))
            .await;
        assert!(matches!(result, Err(AccountingError::InvalidRange { .. })));
    }

    #[tokio::test]
    async fn setting_current_clears_the_previous_flag() {
        let mut manager = manager();
        let fy24 = manager
            .create_year(
                NewFinancialYear::new("FY 2024", date(2024, 1, 1), date(2024, 12, 31)).current(),
            )
            .await
            .unwrap();
        assert!(fy24.is_current);

        let fy25 = manager
            .create_year(
                NewFinancialYear::new("FY 2025", date(2025, 1, 1), date(2025, 12, 31)).current(),
            )
            .await
            .unwrap();

        let current = manager.current_year_required().await.unwrap();
        assert_eq!(current.id, fy25.id);
        assert!(!manager.get_year_required(fy24.id).await.unwrap().is_current);
    }

    #[tokio::test]
    async fn reopen_is_blocked_by_a_later_closed_year() {
        let mut manager = manager();
        let fy24 = manager
            .create_year(NewFinancialYear::new(
                "FY 2024",
                date(2024, 1, 1),
                date(2024, 12, 31),
            ))
            .await
            .unwrap();
        let fy25 = manager
            .create_year(NewFinancialYear::new(
                "FY 2025",
                date(2025, 1, 1),
                date(2025, 12, 31),
            ))
            .await
            .unwrap();

        manager.close_year(fy24.id, "controller").await.unwrap();
        manager.close_year(fy25.id, "controller").await.unwrap();

        let result = manager.reopen_year(fy24.id).await;
        assert!(matches!(
            result,
            Err(AccountingError::NewerYearClosed { ref closed_year, .. })
                if closed_year == "FY 2025"
        ));

        // reopening in reverse order works
        manager.reopen_year(fy25.id).await.unwrap();
        let reopened = manager.reopen_year(fy24.id).await.unwrap();
        assert_eq!(reopened.status, YearStatus::Active);
        assert!(reopened.closed_by.is_none());
        assert!(reopened.closed_at.is_none());
    }
}
