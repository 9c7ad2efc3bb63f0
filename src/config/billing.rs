use crate::core::{AppError, Result};

use super::parse_env;

pub const DEFAULT_MONTHLY_DUE_DAY: u32 = 10;
pub const DEFAULT_ENROLLMENT_DUE_DAY: u32 = 15;

/// Billing calendar settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingConfig {
    /// Day of the billed month on which a monthly invoice falls due
    pub monthly_due_day: u32,
    /// Day of the following month on which enrollment and configuration invoices fall due
    pub enrollment_due_day: u32,
    /// Offset of the hostel's local time from UTC, used to decide "today"
    pub utc_offset_hours: i32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            monthly_due_day: DEFAULT_MONTHLY_DUE_DAY,
            enrollment_due_day: DEFAULT_ENROLLMENT_DUE_DAY,
            utc_offset_hours: 0,
        }
    }
}

impl BillingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            monthly_due_day: parse_env("BILLING_MONTHLY_DUE_DAY", DEFAULT_MONTHLY_DUE_DAY)?,
            enrollment_due_day: parse_env(
                "BILLING_ENROLLMENT_DUE_DAY",
                DEFAULT_ENROLLMENT_DUE_DAY,
            )?,
            utc_offset_hours: parse_env("BILLING_UTC_OFFSET_HOURS", 0)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        for (name, day) in [
            ("BILLING_MONTHLY_DUE_DAY", self.monthly_due_day),
            ("BILLING_ENROLLMENT_DUE_DAY", self.enrollment_due_day),
        ] {
            if !(1..=28).contains(&day) {
                return Err(AppError::Configuration(format!(
                    "{} must be between 1 and 28, got {}",
                    name, day
                )));
            }
        }

        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(AppError::Configuration(format!(
                "BILLING_UTC_OFFSET_HOURS must be between -12 and 14, got {}",
                self.utc_offset_hours
            )));
        }

        Ok(())
    }
}
