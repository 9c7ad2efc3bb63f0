use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::money::validate_positive;
use crate::core::{AppError, Clock, KeyedLocks, Notification, Notifier, Page, PageRequest, Result};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::ledgers::models::{LedgerEntryType, NewLedgerEntry};
use crate::modules::ledgers::services::LedgerService;
use crate::modules::payments::models::{
    CreatePaymentRequest, Payment, PaymentAllocation, PaymentMethod,
};
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::payments::services::allocation::{
    allocate_oldest_first, validate_allocations, AllocationPlan, OpenInvoice,
};
use crate::modules::students::repositories::StudentRepository;

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub student_id: Option<String>,
    pub method: Option<PaymentMethod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl PaymentFilter {
    fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::validation("startDate must not be after endDate"));
            }
        }
        Ok(())
    }

    fn matches(&self, payment: &Payment) -> bool {
        self.student_id.as_ref().map_or(true, |id| &payment.student_id == id)
            && self.method.map_or(true, |m| payment.method == m)
            && self.start_date.map_or(true, |d| payment.payment_date >= d)
            && self.end_date.map_or(true, |d| payment.payment_date <= d)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotal {
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_collected: Decimal,
    pub payment_count: usize,
    pub total_unallocated: Decimal,
    pub by_method: BTreeMap<String, MethodTotal>,
}

pub struct PaymentService {
    payments: PaymentRepository,
    invoices: InvoiceRepository,
    students: StudentRepository,
    ledger: Arc<LedgerService>,
    locks: Arc<KeyedLocks>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl PaymentService {
    pub fn new(
        payments: PaymentRepository,
        invoices: InvoiceRepository,
        students: StudentRepository,
        ledger: Arc<LedgerService>,
        locks: Arc<KeyedLocks>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            payments,
            invoices,
            students,
            ledger,
            locks,
            clock,
            notifier,
        }
    }

    /// Records a payment, settles invoices and credits the ledger
    ///
    /// Whatever is not allocated stays on the ledger as advance.
    pub async fn record(&self, request: CreatePaymentRequest) -> Result<Payment> {
        validate_positive("amount", request.amount)?;
        let student = self.students.require(&request.student_id).await?;
        let _guard = self.locks.acquire(&student.id).await;

        let plan = self.plan(&student.id, request.amount, request.allocations.as_deref()).await?;

        let now = self.clock.now();
        let payment_id = uuid::Uuid::new_v4().to_string();
        let payment_date = request.payment_date.unwrap_or_else(|| self.clock.today());

        for allocation in &plan.allocations {
            let mut invoice = self.invoices.require(&allocation.invoice_id).await?;
            invoice.apply_payment(&payment_id, allocation.amount, now)?;
            self.invoices.update(invoice).await?;
        }

        let description = match &request.reference_number {
            Some(reference) => format!("Payment received ({}, ref {})", request.method, reference),
            None => format!("Payment received ({})", request.method),
        };
        let entry = self
            .ledger
            .record(NewLedgerEntry::credit(
                &student.id,
                LedgerEntryType::Payment,
                description,
                request.amount,
                payment_date,
                Some(payment_id.clone()),
            ))
            .await?;

        let payment = self
            .payments
            .create(Payment {
                id: payment_id,
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                amount: request.amount,
                method: request.method,
                payment_date,
                reference_number: request.reference_number,
                notes: request.notes,
                allocations: plan.allocations,
                unallocated_amount: plan.unallocated,
                ledger_entry_id: Some(entry.id),
                created_at: now,
                version: 0,
            })
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            student_id = %payment.student_id,
            amount = %payment.amount,
            method = %payment.method,
            invoices = payment.allocations.len(),
            unallocated = %payment.unallocated_amount,
            "Payment recorded"
        );

        self.notifier.notify(Notification::PaymentReceived {
            student_id: payment.student_id.clone(),
            payment_id: payment.id.clone(),
            amount: payment.amount,
        });

        Ok(payment)
    }

    async fn plan(
        &self,
        student_id: &str,
        amount: Decimal,
        requested: Option<&[PaymentAllocation]>,
    ) -> Result<AllocationPlan> {
        match requested {
            Some(requested) if !requested.is_empty() => {
                let mut referenced = Vec::with_capacity(requested.len());
                for allocation in requested {
                    if let Some(invoice) = self.invoices.find_by_id(&allocation.invoice_id).await? {
                        referenced.push(OpenInvoice::from(&invoice));
                    }
                }
                validate_allocations(amount, requested, &referenced, student_id)
            }
            _ => {
                let open: Vec<OpenInvoice> = self
                    .invoices
                    .open_for_student(student_id)
                    .await?
                    .iter()
                    .map(OpenInvoice::from)
                    .collect();
                Ok(allocate_oldest_first(amount, &open))
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Payment> {
        self.payments.require(id).await
    }

    /// Filtered payments, latest payment date first
    pub async fn list(&self, filter: PaymentFilter, page: PageRequest) -> Result<Page<Payment>> {
        let mut payments = self.filtered(&filter).await?;
        payments.sort_by(|a, b| (b.payment_date, b.created_at).cmp(&(a.payment_date, a.created_at)));
        Ok(Page::from_items(payments, page))
    }

    pub async fn stats(&self, filter: PaymentFilter) -> Result<PaymentStats> {
        let payments = self.filtered(&filter).await?;

        let mut by_method: BTreeMap<String, MethodTotal> = BTreeMap::new();
        for payment in &payments {
            let bucket = by_method.entry(payment.method.to_string()).or_default();
            bucket.count += 1;
            bucket.amount += payment.amount;
        }

        Ok(PaymentStats {
            total_collected: payments.iter().map(|p| p.amount).sum(),
            payment_count: payments.len(),
            total_unallocated: payments.iter().map(|p| p.unallocated_amount).sum(),
            by_method,
        })
    }

    async fn filtered(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        filter.validate()?;
        Ok(self
            .payments
            .list()
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }
}
