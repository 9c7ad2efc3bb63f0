use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::money::{round_amount, round_rate};
use crate::core::{AppError, Result};
use crate::modules::billing::models::days_in_month;

/// Outcome of prorating a monthly amount over part of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proration {
    pub total_days_in_month: u32,
    pub days_to_calculate: u32,
    pub prorated_amount: Decimal,
    pub is_prorated: bool,
    pub daily_rate: Decimal,
}

/// Prorate `monthly_amount` by the days used in the month of `start_date`
///
/// - no end date (enrollment): from `start_date` to the end of its month, inclusive
/// - end date in the same month (checkout): `start_date..=end_date`
/// - end date in a later month: only the remainder of the start month is billed;
///   later months are covered by their own monthly invoices
///
/// The amount is rounded half away from zero to whole currency units. A full month
/// returns `monthly_amount` untouched.
pub fn calculate_prorated_amount(
    monthly_amount: Decimal,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<Proration> {
    let total_days_in_month = days_in_month(start_date.year(), start_date.month());
    let start_day = start_date.day();

    let days_to_calculate = match end_date {
        Some(end) if end < start_date => {
            return Err(AppError::validation(format!(
                "End date {} is before start date {}",
                end, start_date
            )));
        }
        Some(end) if end.year() == start_date.year() && end.month() == start_date.month() => {
            end.day() - start_day + 1
        }
        _ => total_days_in_month - start_day + 1,
    };

    let total_days = Decimal::from(total_days_in_month);
    let is_prorated = days_to_calculate < total_days_in_month;

    let prorated_amount = if is_prorated {
        round_amount(monthly_amount * Decimal::from(days_to_calculate) / total_days)
    } else {
        monthly_amount
    };

    Ok(Proration {
        total_days_in_month,
        days_to_calculate,
        prorated_amount,
        is_prorated,
        daily_rate: round_rate(monthly_amount / total_days),
    })
}
