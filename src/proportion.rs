//! Casual versus registered rental totals.

use serde::Serialize;

use crate::record::RentalRecord;

/// Raw rental totals for the two user categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserProportion {
    pub casual: u64,
    pub registered: u64,
}

impl UserProportion {
    pub fn as_pair(&self) -> (u64, u64) {
        (self.casual, self.registered)
    }
}

/// Sums casual and registered rentals over `records`.
pub fn proportion_of_users(records: &[RentalRecord]) -> UserProportion {
    records
        .iter()
        .fold(UserProportion::default(), |acc, r| UserProportion {
            casual: acc.casual + r.casual_count,
            registered: acc.registered + r.registered_count,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_proportion_of_users_sums_independently() {
        let date = NaiveDate::from_ymd_opt(2012, 5, 1).unwrap();
        let records = vec![
            RentalRecord::new(date, 100, 200),
            RentalRecord::new(date, 150, 450),
            RentalRecord::new(date, 50, 50),
        ];
        assert_eq!(proportion_of_users(&records).as_pair(), (300, 700));
    }

    #[test]
    fn test_proportion_of_users_empty() {
        assert_eq!(proportion_of_users(&[]), UserProportion::default());
    }
}
