use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Record;
use crate::modules::billing::models::BillingMonth;

/// Money movement over a date range, plus the position at its end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Invoice debits dated in the range
    pub total_invoiced: Decimal,
    /// Payment credits dated in the range
    pub total_collected: Decimal,
    pub collected_by_method: BTreeMap<String, Decimal>,
    pub payment_count: usize,
    pub total_discounts: Decimal,
    pub total_checkout_credits: Decimal,
    /// Net of adjustments and manual charges (debit minus credit)
    pub net_adjustments: Decimal,
    /// Sum of positive student balances as of `period_end`
    pub outstanding_dues: Decimal,
    /// Sum of credit balances as of `period_end`, as a positive amount
    pub advance_held: Decimal,
    /// Collected as a percentage of invoiced
    pub collection_rate: Decimal,
    pub invoice_count: usize,
    pub invoices_by_status: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Financial,
    Monthly,
}

/// Stored snapshot of a generated summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub kind: ReportKind,
    pub month: Option<BillingMonth>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub summary: FinancialSummary,
    #[serde(default)]
    pub version: u64,
}

impl Record for Report {
    const COLLECTION: &'static str = "reports";

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

/// Body of `POST /reports`; `month` for monthly, the date pair for financial
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub kind: ReportKind,
    pub month: Option<BillingMonth>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
