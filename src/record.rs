//! Typed representation of one row of the bike-sharing dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One time-bucketed observation of rental activity.
///
/// Field names follow the cleaned dataset's column headers via `serde(rename)`.
/// Grouping columns are optional: an empty CSV cell deserializes to `None`
/// and is later grouped under [`GroupKey::Missing`](crate::aggregate::GroupKey).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RentalRecord {
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    #[serde(rename = "yr")]
    pub year: Option<u16>,
    #[serde(rename = "mnth", default, deserialize_with = "deserialize_month")]
    pub month: Option<u8>,
    #[serde(rename = "hr", default)]
    pub hour: Option<u8>,
    #[serde(default)]
    pub weekday: Option<String>,

    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "weathersit", default)]
    pub weather_situation: Option<String>,

    #[serde(default)]
    pub holiday: Option<String>,
    #[serde(default)]
    pub weekend: Option<String>,
    #[serde(rename = "workingday", default)]
    pub working_day: Option<String>,

    #[serde(rename = "casual")]
    pub casual_count: u64,
    #[serde(rename = "registered")]
    pub registered_count: u64,
    #[serde(rename = "cnt")]
    pub total_count: u64,
}

impl RentalRecord {
    /// Minimal record used as a starting point by tests and fixtures.
    pub fn new(date: NaiveDate, casual_count: u64, registered_count: u64) -> Self {
        RentalRecord {
            date,
            year: None,
            month: None,
            hour: None,
            weekday: None,
            season: None,
            weather_situation: None,
            holiday: None,
            weekend: None,
            working_day: None,
            casual_count,
            registered_count,
            total_count: casual_count + registered_count,
        }
    }
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses a month cell that is either numeric (`1`..=`12`) or an English
/// month name, full or abbreviated to three letters.
pub fn parse_month(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u8>() {
        return (1..=12).contains(&n).then_some(n);
    }

    let lower = raw.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(&lower)))
        .map(|i| i as u8 + 1)
}

fn deserialize_month<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_month(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized month value {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_numeric() {
        assert_eq!(parse_month("1"), Some(1));
        assert_eq!(parse_month(" 12 "), Some(12));
        assert_eq!(parse_month("0"), None);
        assert_eq!(parse_month("13"), None);
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_month("Jan"), Some(1));
        assert_eq!(parse_month("september"), Some(9));
        assert_eq!(parse_month("DEC"), Some(12));
        assert_eq!(parse_month("Ju"), None);
        assert_eq!(parse_month("Smarch"), None);
    }

    #[test]
    fn test_new_sets_total() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let record = RentalRecord::new(date, 3, 13);
        assert_eq!(record.total_count, 16);
        assert!(record.season.is_none());
    }
}
