use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Number of days in the given calendar month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

/// A calendar month, serialized as `YYYY-MM`
///
/// Internally the first day of the month, so every derived date is valid by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth(NaiveDate);

impl BillingMonth {
    /// Month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        BillingMonth(date - Duration::days(date.day0() as i64))
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0 + Duration::days(self.days() as i64 - 1)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.0.year(), self.0.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    pub fn next(&self) -> Self {
        BillingMonth(self.last_day() + Duration::days(1))
    }

    pub fn previous(&self) -> Self {
        Self::from_date(self.0 - Duration::days(1))
    }

    /// The given day of this month, clamped to the month's last day
    pub fn day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days());
        self.0 + Duration::days(day as i64 - 1)
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for BillingMonth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || AppError::validation(format!("Invalid month '{}'. Expected YYYY-MM", s));

        if s.len() != 7 {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(BillingMonth)
            .map_err(|_| invalid())
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<BillingMonth> for String {
    fn from(month: BillingMonth) -> Self {
        month.to_string()
    }
}
