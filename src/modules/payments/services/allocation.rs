// Splitting a payment across a student's invoices

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::{Invoice, InvoiceStatus};
use crate::modules::payments::models::PaymentAllocation;

/// What allocation needs to know about an invoice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenInvoice {
    pub invoice_id: String,
    pub student_id: String,
    pub due_date: NaiveDate,
    pub balance_due: Decimal,
    pub paid: bool,
}

impl From<&Invoice> for OpenInvoice {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.id.clone(),
            student_id: invoice.student_id.clone(),
            due_date: invoice.due_date,
            balance_due: invoice.balance_due,
            paid: invoice.status == InvoiceStatus::Paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    pub allocations: Vec<PaymentAllocation>,
    /// Not applied to any invoice; becomes advance
    pub unallocated: Decimal,
}

/// Applies `amount` to the invoices with the earliest due date first
///
/// Ties keep the input order. Settled invoices are ignored.
pub fn allocate_oldest_first(amount: Decimal, invoices: &[OpenInvoice]) -> AllocationPlan {
    let mut ordered: Vec<&OpenInvoice> = invoices
        .iter()
        .filter(|i| !i.paid && i.balance_due > Decimal::ZERO)
        .collect();
    ordered.sort_by_key(|i| i.due_date);

    let mut remaining = amount.max(Decimal::ZERO);
    let mut allocations = Vec::new();

    for invoice in ordered {
        if remaining.is_zero() {
            break;
        }
        let applied = remaining.min(invoice.balance_due);
        allocations.push(PaymentAllocation {
            invoice_id: invoice.invoice_id.clone(),
            amount: applied,
        });
        remaining -= applied;
    }

    AllocationPlan {
        allocations,
        unallocated: remaining,
    }
}

/// Checks a caller-supplied split
///
/// Every allocation must be positive, name a distinct unpaid invoice of `student_id`,
/// and stay within that invoice's balance due; together they may not exceed `amount`.
pub fn validate_allocations(
    amount: Decimal,
    requested: &[PaymentAllocation],
    invoices: &[OpenInvoice],
    student_id: &str,
) -> Result<AllocationPlan> {
    let mut seen = HashSet::new();
    let mut total = Decimal::ZERO;

    for allocation in requested {
        if !seen.insert(allocation.invoice_id.as_str()) {
            return Err(AppError::validation(format!(
                "Invoice {} appears more than once in allocations",
                allocation.invoice_id
            )));
        }
        if allocation.amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Allocation to invoice {} must be greater than zero",
                allocation.invoice_id
            )));
        }

        let invoice = invoices
            .iter()
            .find(|i| i.invoice_id == allocation.invoice_id)
            .ok_or_else(|| AppError::not_found(format!("Invoice {}", allocation.invoice_id)))?;

        if invoice.student_id != student_id {
            return Err(AppError::validation(format!(
                "Invoice {} does not belong to student {}",
                invoice.invoice_id, student_id
            )));
        }
        if invoice.paid {
            return Err(AppError::validation(format!(
                "Invoice {} is already paid",
                invoice.invoice_id
            )));
        }
        if allocation.amount > invoice.balance_due {
            return Err(AppError::validation(format!(
                "Allocation {} exceeds balance due {} on invoice {}",
                allocation.amount, invoice.balance_due, invoice.invoice_id
            )));
        }

        total += allocation.amount;
    }

    if total > amount {
        return Err(AppError::validation(format!(
            "Allocations total {} exceeds payment amount {}",
            total, amount
        )));
    }

    Ok(AllocationPlan {
        allocations: requested.to_vec(),
        unallocated: amount - total,
    })
}
