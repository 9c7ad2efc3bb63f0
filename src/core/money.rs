use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Amounts are billed in whole currency units
pub const AMOUNT_SCALE: u32 = 0;

/// Daily rates are shown with two decimal places
pub const RATE_SCALE: u32 = 2;

/// Rounds an amount to whole currency units, half away from zero
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a per-day rate for display
pub fn round_rate(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates a fee amount: non-negative and in whole currency units
pub fn validate_fee(field: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} cannot be negative, got: {}",
            field, amount
        )));
    }

    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(AppError::validation(format!(
            "{} must be a whole amount, got: {}",
            field, amount
        )));
    }

    Ok(())
}

/// Validates a transaction amount (payment, discount, manual entry): strictly positive,
/// at most two decimal places
pub fn validate_positive(field: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be greater than zero, got: {}",
            field, amount
        )));
    }

    if amount.normalize().scale() > RATE_SCALE {
        return Err(AppError::validation(format!(
            "{} can have at most {} decimal places, got: {}",
            field, RATE_SCALE, amount
        )));
    }

    Ok(())
}

/// Percentage `part / whole * 100`, two decimals, zero when `whole` is zero
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_rate(part * Decimal::ONE_HUNDRED / whole)
}
