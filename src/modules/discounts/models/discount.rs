use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::validate_positive;
use crate::core::{AppError, Record, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus {
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub amount: Decimal,
    pub reason: String,
    pub status: DiscountStatus,
    pub applied_by: Option<String>,
    pub date: NaiveDate,
    /// Invoice the discount was set against, if any
    pub invoice_id: Option<String>,
    /// Portion that reduced the invoice's balance
    pub applied_to_invoice: Decimal,
    pub ledger_entry_id: Option<String>,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Record for Discount {
    const COLLECTION: &'static str = "discounts";

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Discount {
    pub fn is_active(&self) -> bool {
        self.status == DiscountStatus::Active
    }

    /// Same reason, ignoring case and surrounding whitespace
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reason.trim().eq_ignore_ascii_case(reason.trim())
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(AppError::conflict(format!(
                "Discount {} is already expired",
                self.id
            )));
        }

        self.status = DiscountStatus::Expired;
        self.expired_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDiscountRequest {
    pub student_id: String,
    pub amount: Decimal,
    pub reason: String,
    pub applied_by: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub invoice_id: Option<String>,
}

impl ApplyDiscountRequest {
    pub fn validate(&self) -> Result<()> {
        validate_positive("amount", self.amount)?;
        if self.reason.trim().is_empty() {
            return Err(AppError::validation("reason cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDiscountRequest {
    pub student_ids: Vec<String>,
    pub amount: Decimal,
    pub reason: String,
    pub applied_by: Option<String>,
    pub date: Option<NaiveDate>,
}

impl BulkDiscountRequest {
    pub fn for_student(&self, student_id: &str) -> ApplyDiscountRequest {
        ApplyDiscountRequest {
            student_id: student_id.to_string(),
            amount: self.amount,
            reason: self.reason.clone(),
            applied_by: self.applied_by.clone(),
            date: self.date,
            invoice_id: None,
        }
    }
}
