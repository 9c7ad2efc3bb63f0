use chrono::NaiveDate;

use super::BillingMonth;
use crate::modules::invoices::models::InvoiceKind;

/// Event that causes an invoice to be issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingTrigger {
    /// Enrollment with fees known up front, billed from the given date
    Enrollment(NaiveDate),
    /// First fee configuration of a pending student, billed from the given date
    ConfigurationChange(NaiveDate),
    MonthlyCycle(BillingMonth),
    /// Checkout on the given date, billing the unbilled part of that month
    Checkout(NaiveDate),
}

impl BillingTrigger {
    pub fn kind(&self) -> InvoiceKind {
        match self {
            BillingTrigger::Enrollment(_) => InvoiceKind::Enrollment,
            BillingTrigger::ConfigurationChange(_) => InvoiceKind::Configuration,
            BillingTrigger::MonthlyCycle(_) => InvoiceKind::Monthly,
            BillingTrigger::Checkout(_) => InvoiceKind::Checkout,
        }
    }

    pub fn billing_month(&self) -> BillingMonth {
        match *self {
            BillingTrigger::Enrollment(date)
            | BillingTrigger::ConfigurationChange(date)
            | BillingTrigger::Checkout(date) => BillingMonth::from_date(date),
            BillingTrigger::MonthlyCycle(month) => month,
        }
    }
}
