//! Pay period model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The date range a payroll run covers.
///
/// # Example
///
/// ```
/// use hrms_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
/// ).unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())); // after
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::invalid_field(
                "end_date",
                format!("{} is before start_date {}", end_date, start_date),
            ));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this pay period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_before_start_rejected() {
        let result = PayPeriod::new(date(2025, 6, 30), date(2025, 6, 1));
        assert!(matches!(result, Err(EngineError::InvalidField { field, .. }) if field == "end_date"));
    }

    #[test]
    fn test_single_day_period() {
        let period = PayPeriod::new(date(2025, 6, 15), date(2025, 6, 15)).unwrap();
        assert!(period.contains_date(date(2025, 6, 15)));
        assert!(!period.contains_date(date(2025, 6, 14)));
    }

    #[test]
    fn test_deserialize_pay_period() {
        let json = r#"{"start_date": "2025-06-01", "end_date": "2025-06-30"}"#;
        let period: PayPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.start_date, date(2025, 6, 1));
        assert_eq!(period.end_date, date(2025, 6, 30));
    }
}
