//! Assembles every summary the dashboard page charts.

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{Aggregator, SummaryTable};
use crate::error::{DashboardError, Result};
use crate::filter::{DateRange, filter_by_date};
use crate::highlight::{HighlightTag, assign_highlight};
use crate::proportion::{UserProportion, proportion_of_users};
use crate::record::RentalRecord;

/// A summary table paired with its per-bar colours.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart<K> {
    pub title: &'static str,
    pub rows: SummaryTable<K>,
    pub colors: Vec<HighlightTag>,
}

impl<K> BarChart<K> {
    pub fn new(title: &'static str, rows: SummaryTable<K>) -> Self {
        let colors = assign_highlight(&rows);
        BarChart {
            title,
            rows,
            colors,
        }
    }
}

/// Monthly totals for the two observed years, drawn as overlaid lines.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyComparison {
    pub year_2011: SummaryTable<u8>,
    pub year_2012: SummaryTable<u8>,
}

/// Everything one render of the page needs, computed from a single
/// date selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Selected interval.
    pub range: DateRange,
    /// Observed min/max date of the full dataset; limits the date control.
    pub bounds: DateRange,
    pub record_count: usize,

    pub by_year: BarChart<u16>,
    pub by_month: MonthlyComparison,
    pub by_weather: BarChart<String>,
    pub by_season: BarChart<String>,
    pub by_weekday: BarChart<String>,
    pub users: UserProportion,
    pub by_hour: BarChart<u8>,
    pub by_holiday: BarChart<String>,
    pub by_weekend: BarChart<String>,
    pub by_working_day: BarChart<String>,
}

impl Dashboard {
    /// Filters `records` to `selection` (the full observed range when `None`)
    /// and runs every summary on the result.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::EmptyDataset`] when `records` is empty, since
    /// there is no observed range to default the selection to.
    #[tracing::instrument(skip(records, aggregator), fields(rows = records.len()))]
    pub fn build(
        records: &[RentalRecord],
        selection: Option<DateRange>,
        aggregator: Aggregator,
    ) -> Result<Self> {
        let bounds = DateRange::observed(records)
            .ok_or_else(|| DashboardError::EmptyDataset("no rows to chart".to_string()))?;
        let range = selection.unwrap_or(bounds);

        let filtered = filter_by_date(records, range);
        debug!(
            start = %range.start(),
            end = %range.end(),
            in_range = filtered.len(),
            "Records filtered"
        );

        let dashboard = Dashboard {
            range,
            bounds,
            record_count: filtered.len(),
            by_year: BarChart::new("Total Bike Rentals by Year", aggregator.year_rentals(&filtered)),
            by_month: MonthlyComparison {
                year_2011: aggregator.monthly_rentals_2011(&filtered),
                year_2012: aggregator.monthly_rentals_2012(&filtered),
            },
            by_weather: BarChart::new("By Weather Condition", aggregator.weather_rentals(&filtered)),
            by_season: BarChart::new("By Season", aggregator.season_rentals(&filtered)),
            by_weekday: BarChart::new("Rentals by Days", aggregator.weekday_rentals(&filtered)),
            users: proportion_of_users(&filtered),
            by_hour: BarChart::new(
                "Hours with Highest Bike Rentals",
                aggregator.hourly_rentals(&filtered),
            ),
            by_holiday: BarChart::new("Rentals on Holidays", aggregator.holiday_rentals(&filtered)),
            by_weekend: BarChart::new("Rentals on Weekends", aggregator.weekend_rentals(&filtered)),
            by_working_day: BarChart::new(
                "Rentals on Working Days",
                aggregator.working_day_rentals(&filtered),
            ),
        };

        info!(
            records = dashboard.record_count,
            total = dashboard.by_year.rows.grand_total(),
            "Dashboard built"
        );
        Ok(dashboard)
    }
}
