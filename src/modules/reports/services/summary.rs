// Period aggregation over ledgers, payments and invoices

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::money::percentage;
use crate::modules::invoices::models::{Invoice, InvoiceStatus};
use crate::modules::ledgers::models::{LedgerEntryType, StudentLedger};
use crate::modules::payments::models::Payment;
use crate::modules::reports::models::FinancialSummary;

/// Longest range a report may cover, in days, both ends included
pub const MAX_REPORT_DAYS: i64 = 366;

/// Builds the summary for `start..=end`
///
/// Flows come from ledger entries dated in the range. Outstanding dues and advance
/// are each student's balance over entries dated up to `end`. Invoices are counted
/// when their period starts in the range.
pub fn summarize_period(
    start: NaiveDate,
    end: NaiveDate,
    ledgers: &[StudentLedger],
    payments: &[Payment],
    invoices: &[Invoice],
) -> FinancialSummary {
    let in_range = |date: NaiveDate| date >= start && date <= end;

    let mut total_invoiced = Decimal::ZERO;
    let mut total_collected = Decimal::ZERO;
    let mut total_discounts = Decimal::ZERO;
    let mut total_checkout_credits = Decimal::ZERO;
    let mut net_adjustments = Decimal::ZERO;
    let mut outstanding_dues = Decimal::ZERO;
    let mut advance_held = Decimal::ZERO;

    for ledger in ledgers {
        let mut balance = Decimal::ZERO;

        for entry in ledger.entries.iter().filter(|e| e.date <= end) {
            balance += entry.net();
            if !in_range(entry.date) {
                continue;
            }

            match entry.entry_type {
                LedgerEntryType::Invoice => total_invoiced += entry.debit - entry.credit,
                LedgerEntryType::Payment => total_collected += entry.credit - entry.debit,
                LedgerEntryType::Discount => total_discounts += entry.credit - entry.debit,
                LedgerEntryType::CheckoutCredit => {
                    total_checkout_credits += entry.credit - entry.debit
                }
                LedgerEntryType::Adjustment | LedgerEntryType::ManualCharge => {
                    net_adjustments += entry.net()
                }
            }
        }

        if balance > Decimal::ZERO {
            outstanding_dues += balance;
        } else {
            advance_held -= balance;
        }
    }

    let mut collected_by_method: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut payment_count = 0;
    for payment in payments.iter().filter(|p| in_range(p.payment_date)) {
        *collected_by_method.entry(payment.method.to_string()).or_default() += payment.amount;
        payment_count += 1;
    }

    let mut invoices_by_status: BTreeMap<String, usize> = [
        InvoiceStatus::Unpaid,
        InvoiceStatus::PartiallyPaid,
        InvoiceStatus::Paid,
    ]
    .iter()
    .map(|s| (s.to_string(), 0))
    .collect();
    let mut invoice_count = 0;
    for invoice in invoices.iter().filter(|i| in_range(i.period_start)) {
        *invoices_by_status.entry(invoice.status.to_string()).or_default() += 1;
        invoice_count += 1;
    }

    FinancialSummary {
        period_start: start,
        period_end: end,
        total_invoiced,
        total_collected,
        collected_by_method,
        payment_count,
        total_discounts,
        total_checkout_credits,
        net_adjustments,
        outstanding_dues,
        advance_held,
        collection_rate: percentage(total_collected, total_invoiced),
        invoice_count,
        invoices_by_status,
    }
}
