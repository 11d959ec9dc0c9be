//! Group-and-sum summaries over the filtered record set.
//!
//! Every summary partitions the records by one column, sums `total_count`
//! per partition and orders the result by a [`SortPolicy`]. Partitions come
//! out in ascending key order with [`GroupKey::Missing`] last; sorting by sum
//! is stable, so equal sums keep that order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::record::RentalRecord;

/// Partition key of a summary row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey<K> {
    Value(K),
    /// The grouping column was empty for these records.
    Missing,
}

impl<K: Serialize> Serialize for GroupKey<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Value(k) => k.serialize(serializer),
            GroupKey::Missing => serializer.serialize_none(),
        }
    }
}

impl<K: fmt::Display> fmt::Display for GroupKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Value(k) => k.fmt(f),
            GroupKey::Missing => f.write_str("(missing)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow<K> {
    pub key: GroupKey<K>,
    pub total: u64,
}

/// Ordered `(key, summed total_count)` rows produced by one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryTable<K> {
    rows: Vec<SummaryRow<K>>,
}

impl<K> SummaryTable<K> {
    pub fn rows(&self) -> &[SummaryRow<K>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryRow<K>> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn totals(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(|r| r.total)
    }

    pub fn grand_total(&self) -> u64 {
        self.totals().sum()
    }

    pub fn max_total(&self) -> Option<u64> {
        self.totals().max()
    }
}

impl<K> FromIterator<(GroupKey<K>, u64)> for SummaryTable<K> {
    fn from_iter<I: IntoIterator<Item = (GroupKey<K>, u64)>>(iter: I) -> Self {
        SummaryTable {
            rows: iter
                .into_iter()
                .map(|(key, total)| SummaryRow { key, total })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// Keep partition order (ascending key).
    KeyOrder,
    SumAscending,
    SumDescending,
}

/// What to do with records whose grouping column is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeys {
    /// Sum them under [`GroupKey::Missing`].
    #[default]
    Group,
    /// Leave them out of the summary.
    Drop,
}

/// The shared partition/sum/sort step behind every summary.
pub fn summarize<'a, I, K, F>(
    records: I,
    key_of: F,
    sort: SortPolicy,
    missing: MissingKeys,
) -> SummaryTable<K>
where
    I: IntoIterator<Item = &'a RentalRecord>,
    K: Ord,
    F: Fn(&RentalRecord) -> Option<K>,
{
    let mut groups: BTreeMap<GroupKey<K>, u64> = BTreeMap::new();

    for record in records {
        let key = match (key_of(record), missing) {
            (Some(k), _) => GroupKey::Value(k),
            (None, MissingKeys::Group) => GroupKey::Missing,
            (None, MissingKeys::Drop) => continue,
        };
        *groups.entry(key).or_default() += record.total_count;
    }

    let mut rows: Vec<SummaryRow<K>> = groups
        .into_iter()
        .map(|(key, total)| SummaryRow { key, total })
        .collect();

    match sort {
        SortPolicy::KeyOrder => {}
        SortPolicy::SumAscending => rows.sort_by_key(|r| r.total),
        SortPolicy::SumDescending => rows.sort_by(|a, b| b.total.cmp(&a.total)),
    }

    SummaryTable { rows }
}

/// Runs the dashboard's ten summaries under one missing-key policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    missing: MissingKeys,
}

impl Aggregator {
    pub fn new(missing: MissingKeys) -> Self {
        Aggregator { missing }
    }

    /// Rentals per year, ascending by total.
    pub fn year_rentals(&self, records: &[RentalRecord]) -> SummaryTable<u16> {
        summarize(records, |r| r.year, SortPolicy::SumAscending, self.missing)
    }

    /// Rentals per month within `year`, ascending by month.
    ///
    /// Records with no year are never part of any year's table.
    pub fn monthly_rentals(&self, records: &[RentalRecord], year: u16) -> SummaryTable<u8> {
        summarize(
            records.iter().filter(|r| r.year == Some(year)),
            |r| r.month,
            SortPolicy::KeyOrder,
            self.missing,
        )
    }

    pub fn monthly_rentals_2011(&self, records: &[RentalRecord]) -> SummaryTable<u8> {
        self.monthly_rentals(records, 2011)
    }

    pub fn monthly_rentals_2012(&self, records: &[RentalRecord]) -> SummaryTable<u8> {
        self.monthly_rentals(records, 2012)
    }

    pub fn season_rentals(&self, records: &[RentalRecord]) -> SummaryTable<String> {
        summarize(
            records,
            |r| r.season.clone(),
            SortPolicy::SumDescending,
            self.missing,
        )
    }

    pub fn weather_rentals(&self, records: &[RentalRecord]) -> SummaryTable<String> {
        summarize(
            records,
            |r| r.weather_situation.clone(),
            SortPolicy::SumDescending,
            self.missing,
        )
    }

    pub fn weekday_rentals(&self, records: &[RentalRecord]) -> SummaryTable<String> {
        summarize(
            records,
            |r| r.weekday.clone(),
            SortPolicy::SumDescending,
            self.missing,
        )
    }

    /// Rentals per hour of day in hour order.
    pub fn hourly_rentals(&self, records: &[RentalRecord]) -> SummaryTable<u8> {
        summarize(records, |r| r.hour, SortPolicy::KeyOrder, self.missing)
    }

    pub fn holiday_rentals(&self, records: &[RentalRecord]) -> SummaryTable<String> {
        summarize(
            records,
            |r| r.holiday.clone(),
            SortPolicy::SumDescending,
            self.missing,
        )
    }

    pub fn weekend_rentals(&self, records: &[RentalRecord]) -> SummaryTable<String> {
        summarize(
            records,
            |r| r.weekend.clone(),
            SortPolicy::SumDescending,
            self.missing,
        )
    }

    pub fn working_day_rentals(&self, records: &[RentalRecord]) -> SummaryTable<String> {
        summarize(
            records,
            |r| r.working_day.clone(),
            SortPolicy::SumDescending,
            self.missing,
        )
    }
}
