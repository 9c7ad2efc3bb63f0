// Invoice aggregate
//
// One invoice per student per billing month. Totals are fixed at creation; payments
// and discounts reduce `balance_due` and drive the status.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::LineItem;
use crate::core::{AppError, Record, Result};
use crate::modules::billing::models::BillingMonth;

/// Invoice payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Unpaid => write!(f, "unpaid"),
            InvoiceStatus::PartiallyPaid => write!(f, "partially_paid"),
            InvoiceStatus::Paid => write!(f, "paid"),
        }
    }
}

/// What caused the invoice to be issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    Enrollment,
    Monthly,
    Configuration,
    Checkout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub room_number: Option<String>,
    pub billing_month: BillingMonth,
    pub kind: InvoiceKind,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub line_items: Vec<LineItem>,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub discount_amount: Decimal,
    pub balance_due: Decimal,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub payment_ids: Vec<String>,
    #[serde(default)]
    pub discount_ids: Vec<String>,
    /// Debit recorded in the student ledger for this invoice
    pub ledger_entry_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Record for Invoice {
    const COLLECTION: &'static str = "invoices";

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

impl Invoice {
    pub fn is_open(&self) -> bool {
        self.status != InvoiceStatus::Paid && self.balance_due > Decimal::ZERO
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date < today
    }

    /// Applies part of a payment to this invoice
    ///
    /// The amount must be positive and no more than the balance due.
    pub fn apply_payment(
        &mut self,
        payment_id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Allocation to invoice {} must be greater than zero",
                self.id
            )));
        }
        if amount > self.balance_due {
            return Err(AppError::validation(format!(
                "Allocation {} exceeds balance due {} on invoice {}",
                amount, self.balance_due, self.id
            )));
        }

        self.paid_amount += amount;
        self.balance_due -= amount;
        self.payment_ids.push(payment_id.to_string());
        self.refresh_status();
        self.updated_at = now;

        Ok(())
    }

    /// Applies a discount, capped at the balance due; returns the amount applied
    pub fn apply_discount(
        &mut self,
        discount_id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Decimal {
        let applied = amount.min(self.balance_due).max(Decimal::ZERO);

        self.discount_amount += applied;
        self.balance_due -= applied;
        self.discount_ids.push(discount_id.to_string());
        self.refresh_status();
        self.updated_at = now;

        applied
    }

    fn refresh_status(&mut self) {
        self.status = if self.balance_due <= Decimal::ZERO {
            InvoiceStatus::Paid
        } else if self.paid_amount > Decimal::ZERO || self.discount_amount > Decimal::ZERO {
            InvoiceStatus::PartiallyPaid
        } else {
            InvoiceStatus::Unpaid
        };
    }
}
