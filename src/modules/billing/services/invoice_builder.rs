// Assembles an invoice for a student from a billing trigger
//
// Each fee category becomes one line, prorated over the billed period. The builder is
// pure: persisting the invoice, the duplicate guard and the ledger debit live in the
// invoice service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::config::BillingConfig;
use crate::core::{AppError, Result};
use crate::modules::billing::models::{BillingMonth, BillingTrigger};
use crate::modules::invoices::models::{Invoice, InvoiceStatus, LineItem};
use crate::modules::students::models::Student;

/// Billed period and due date for a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub month: BillingMonth,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceBuilder {
    config: BillingConfig,
}

impl InvoiceBuilder {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// Works out which days a trigger bills and when the invoice falls due
    pub fn period(&self, student: &Student, trigger: BillingTrigger) -> Result<BillingPeriod> {
        let month = trigger.billing_month();

        let period = match trigger {
            BillingTrigger::Enrollment(date) | BillingTrigger::ConfigurationChange(date) => {
                BillingPeriod {
                    month,
                    start: date,
                    end: month.last_day(),
                    due_date: month.next().day(self.config.enrollment_due_day),
                }
            }
            BillingTrigger::MonthlyCycle(month) => {
                if student.enrollment_date > month.last_day() {
                    return Err(AppError::validation(format!(
                        "Student {} enrolled on {}, after billing month {}",
                        student.id, student.enrollment_date, month
                    )));
                }

                let start = month.first_day().max(student.enrollment_date);
                BillingPeriod {
                    month,
                    start,
                    end: month.last_day(),
                    due_date: month.day(self.config.monthly_due_day).max(start),
                }
            }
            BillingTrigger::Checkout(date) => {
                if date < student.enrollment_date {
                    return Err(AppError::validation(format!(
                        "Checkout date {} is before enrollment date {}",
                        date, student.enrollment_date
                    )));
                }

                BillingPeriod {
                    month,
                    start: month.first_day().max(student.enrollment_date),
                    end: date,
                    due_date: date,
                }
            }
        };

        Ok(period)
    }

    /// Builds the line-itemized invoice for `student`
    ///
    /// Fails with Validation when the student is checked out, has no fee
    /// configuration, or the period bills nothing.
    pub fn build(
        &self,
        student: &Student,
        trigger: BillingTrigger,
        now: DateTime<Utc>,
    ) -> Result<Invoice> {
        self.draft(student, trigger, now)?.ok_or_else(|| {
            AppError::validation(format!(
                "Nothing to bill for student {} in {}",
                student.id,
                trigger.billing_month()
            ))
        })
    }

    /// Like [`build`](Self::build), but a period whose prorated lines all round to
    /// zero yields `None` instead of an error
    pub fn draft(
        &self,
        student: &Student,
        trigger: BillingTrigger,
        now: DateTime<Utc>,
    ) -> Result<Option<Invoice>> {
        let fees = student.require_fees()?;
        let period = self.period(student, trigger)?;

        // Checkout bills up to the checkout day; every other trigger runs to month end
        let end = match trigger {
            BillingTrigger::Checkout(date) => Some(date),
            _ => None,
        };

        let mut line_items = Vec::new();
        for (description, category, monthly_amount) in fees.components() {
            let line = LineItem::prorated(description, category, monthly_amount, period.start, end)?;
            if !line.amount.is_zero() {
                line_items.push(line);
            }
        }

        let total: Decimal = line_items.iter().map(|l| l.amount).sum();
        if total <= Decimal::ZERO {
            return Ok(None);
        }

        Ok(Some(Invoice {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            room_number: student.room_number.clone(),
            billing_month: period.month,
            kind: trigger.kind(),
            period_start: period.start,
            period_end: period.end,
            line_items,
            total,
            paid_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            balance_due: total,
            status: InvoiceStatus::Unpaid,
            due_date: period.due_date,
            payment_ids: Vec::new(),
            discount_ids: Vec::new(),
            ledger_entry_id: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }))
    }
}
