//! Date-range selection over the record set.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::record::RentalRecord;

/// An inclusive calendar interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `start > end` with
    /// [`DashboardError::InvalidRange`].
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// The smallest range covering every record's date, or `None` when the
    /// record set is empty.
    pub fn observed(records: &[RentalRecord]) -> Option<Self> {
        let start = records.iter().map(|r| r.date).min()?;
        let end = records.iter().map(|r| r.date).max()?;
        Some(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Completes a partial selection. A missing start falls back to
    /// `bounds.start()` and a missing end to `bounds.end()`, except that a
    /// fallback never lands on the wrong side of the date that was given.
    /// Given dates are kept as is, even outside `bounds`.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        bounds: DateRange,
    ) -> Result<Self> {
        let start = start.unwrap_or_else(|| end.map_or(bounds.start, |e| e.min(bounds.start)));
        let end = end.unwrap_or_else(|| start.max(bounds.end));
        DateRange::new(start, end)
    }
}

/// Returns the records whose date falls inside `range`, preserving input order.
pub fn filter_by_date(records: &[RentalRecord], range: DateRange) -> Vec<RentalRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}
