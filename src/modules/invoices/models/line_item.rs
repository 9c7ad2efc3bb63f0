// Invoice line: one fee category, prorated over the billed days
//
// Lines are fixed when the invoice is built; payments and discounts only move the
// invoice-level paid/discount/balance fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::modules::billing::services::proration::calculate_prorated_amount;
use crate::modules::students::models::FeeCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub category: FeeCategory,
    /// Full monthly fee before proration
    pub monthly_amount: Decimal,
    pub days_billed: u32,
    pub days_in_month: u32,
    /// Billed amount, whole currency units
    pub amount: Decimal,
    pub is_prorated: bool,
}

impl LineItem {
    /// Prorates `monthly_amount` over `start..=end` (or to month end)
    pub fn prorated(
        description: String,
        category: FeeCategory,
        monthly_amount: Decimal,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        let proration = calculate_prorated_amount(monthly_amount, start, end)?;

        Ok(Self {
            description,
            category,
            monthly_amount,
            days_billed: proration.days_to_calculate,
            days_in_month: proration.total_days_in_month,
            amount: proration.prorated_amount,
            is_prorated: proration.is_prorated,
        })
    }
}
