use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::BillingConfig;
use crate::core::{AppError, Clock, KeyedLocks, Notification, Notifier, Page, PageRequest, Result};
use crate::modules::billing::models::{BillingMonth, BillingTrigger};
use crate::modules::billing::services::InvoiceBuilder;
use crate::modules::invoices::models::{Invoice, InvoiceKind, InvoiceStatus};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::ledgers::models::{LedgerEntryType, NewLedgerEntry};
use crate::modules::ledgers::services::LedgerService;
use crate::modules::students::models::Student;
use crate::modules::students::repositories::StudentRepository;

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub student_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub month: Option<BillingMonth>,
    pub kind: Option<InvoiceKind>,
}

impl InvoiceFilter {
    fn matches(&self, invoice: &Invoice) -> bool {
        self.student_id.as_ref().map_or(true, |id| &invoice.student_id == id)
            && self.status.map_or(true, |s| invoice.status == s)
            && self.month.map_or(true, |m| invoice.billing_month == m)
            && self.kind.map_or(true, |k| invoice.kind == k)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    pub total_invoices: usize,
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub total_discounts: Decimal,
    pub total_outstanding: Decimal,
    pub overdue_count: usize,
    /// Keyed by status name; `amount` is the invoiced total in that status
    pub by_status: BTreeMap<String, StatusBucket>,
}

pub struct InvoiceService {
    invoices: InvoiceRepository,
    students: StudentRepository,
    ledger: Arc<LedgerService>,
    builder: InvoiceBuilder,
    locks: Arc<KeyedLocks>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl InvoiceService {
    pub fn new(
        invoices: InvoiceRepository,
        students: StudentRepository,
        ledger: Arc<LedgerService>,
        config: BillingConfig,
        locks: Arc<KeyedLocks>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            invoices,
            students,
            ledger,
            builder: InvoiceBuilder::new(config),
            locks,
            clock,
            notifier,
        }
    }

    pub fn builder(&self) -> &InvoiceBuilder {
        &self.builder
    }

    /// Issues an invoice for `student` and records its ledger debit
    ///
    /// A second invoice for the same student and month is a Conflict.
    pub async fn bill_student(&self, student: &Student, trigger: BillingTrigger) -> Result<Invoice> {
        let month = trigger.billing_month();
        let _guard = self.locks.acquire(&student.id).await;

        if let Some(existing) = self.invoices.find_for_student_month(&student.id, month).await? {
            return Err(AppError::conflict(format!(
                "Invoice {} already exists for student {} in {}",
                existing.id, student.id, month
            )));
        }

        let invoice = self.builder.build(student, trigger, self.clock.now())?;
        let mut invoice = self.invoices.create(invoice).await?;

        let entry = self
            .ledger
            .record(NewLedgerEntry::debit(
                &invoice.student_id,
                LedgerEntryType::Invoice,
                format!("{} invoice for {}", kind_label(invoice.kind), month),
                invoice.total,
                invoice.period_start,
                Some(invoice.id.clone()),
            ))
            .await?;

        invoice.ledger_entry_id = Some(entry.id);
        let invoice = self.invoices.update(invoice).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            student_id = %invoice.student_id,
            month = %month,
            kind = ?invoice.kind,
            total = %invoice.total,
            "Invoice generated"
        );

        self.notifier.notify(Notification::InvoiceGenerated {
            student_id: invoice.student_id.clone(),
            invoice_id: invoice.id.clone(),
            total: invoice.total,
        });

        Ok(invoice)
    }

    /// Monthly invoice for one student, outside the batch run
    pub async fn generate_for_student(&self, student_id: &str, month: BillingMonth) -> Result<Invoice> {
        let student = self.students.require(student_id).await?;
        student.require_fees()?;

        self.bill_student(&student, BillingTrigger::MonthlyCycle(month))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Invoice> {
        self.invoices.require(id).await
    }

    /// Filtered invoices, newest billing month first
    pub async fn list(&self, filter: InvoiceFilter, page: PageRequest) -> Result<Page<Invoice>> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .list()
            .await?
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect();
        invoices.sort_by(|a, b| {
            (b.billing_month, b.created_at).cmp(&(a.billing_month, a.created_at))
        });

        Ok(Page::from_items(invoices, page))
    }

    pub async fn stats(&self, filter: InvoiceFilter) -> Result<InvoiceStats> {
        let today = self.clock.today();
        let invoices: Vec<Invoice> = self
            .invoices
            .list()
            .await?
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect();

        let mut by_status: BTreeMap<String, StatusBucket> = [
            InvoiceStatus::Unpaid,
            InvoiceStatus::PartiallyPaid,
            InvoiceStatus::Paid,
        ]
        .iter()
        .map(|s| (s.to_string(), StatusBucket::default()))
        .collect();

        for invoice in &invoices {
            let bucket = by_status.entry(invoice.status.to_string()).or_default();
            bucket.count += 1;
            bucket.amount += invoice.total;
        }

        Ok(InvoiceStats {
            total_invoices: invoices.len(),
            total_amount: invoices.iter().map(|i| i.total).sum(),
            total_paid: invoices.iter().map(|i| i.paid_amount).sum(),
            total_discounts: invoices.iter().map(|i| i.discount_amount).sum(),
            total_outstanding: invoices.iter().map(|i| i.balance_due).sum(),
            overdue_count: invoices.iter().filter(|i| i.is_overdue(today)).count(),
            by_status,
        })
    }
}

fn kind_label(kind: InvoiceKind) -> &'static str {
    match kind {
        InvoiceKind::Enrollment => "Enrollment",
        InvoiceKind::Monthly => "Monthly",
        InvoiceKind::Configuration => "Initial",
        InvoiceKind::Checkout => "Checkout",
    }
}
