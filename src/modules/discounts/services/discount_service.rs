use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AppError, Clock, KeyedLocks, Page, PageRequest, Result};
use crate::modules::discounts::models::{
    ApplyDiscountRequest, BulkDiscountRequest, Discount, DiscountStatus,
};
use crate::modules::discounts::repositories::DiscountRepository;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::ledgers::models::{LedgerEntryType, NewLedgerEntry};
use crate::modules::ledgers::services::LedgerService;
use crate::modules::students::repositories::StudentRepository;

#[derive(Debug, Clone, Default)]
pub struct DiscountFilter {
    pub student_id: Option<String>,
    pub status: Option<DiscountStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDiscountFailure {
    pub student_id: String,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDiscountOutcome {
    pub successful: Vec<Discount>,
    pub failed: Vec<BulkDiscountFailure>,
    pub success_count: usize,
    pub failed_count: usize,
    pub total_amount: Decimal,
}

pub struct DiscountService {
    discounts: DiscountRepository,
    students: StudentRepository,
    invoices: InvoiceRepository,
    ledger: Arc<LedgerService>,
    locks: Arc<KeyedLocks>,
    clock: Arc<dyn Clock>,
}

impl DiscountService {
    pub fn new(
        discounts: DiscountRepository,
        students: StudentRepository,
        invoices: InvoiceRepository,
        ledger: Arc<LedgerService>,
        locks: Arc<KeyedLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            discounts,
            students,
            invoices,
            ledger,
            locks,
            clock,
        }
    }

    /// Grants a discount and credits it to the student's ledger
    ///
    /// Only one active discount per student and reason is allowed.
    pub async fn apply(&self, request: ApplyDiscountRequest) -> Result<Discount> {
        request.validate()?;
        let student = self.students.require(&request.student_id).await?;
        let _guard = self.locks.acquire(&student.id).await;

        if let Some(existing) = self.discounts.find_active(&student.id, &request.reason).await? {
            return Err(AppError::conflict(format!(
                "Student {} already has an active '{}' discount ({})",
                student.id, existing.reason, existing.id
            )));
        }

        let now = self.clock.now();
        let discount_id = uuid::Uuid::new_v4().to_string();
        let reason = request.reason.trim().to_string();
        let date = request.date.unwrap_or_else(|| self.clock.today());

        let invoice = match &request.invoice_id {
            Some(invoice_id) => {
                let invoice = self.invoices.require(invoice_id).await?;
                if invoice.student_id != student.id {
                    return Err(AppError::validation(format!(
                        "Invoice {} does not belong to student {}",
                        invoice.id, student.id
                    )));
                }
                Some(invoice)
            }
            None => None,
        };

        let mut applied_to_invoice = Decimal::ZERO;
        if let Some(mut invoice) = invoice {
            applied_to_invoice = invoice.apply_discount(&discount_id, request.amount, now);
            self.invoices.update(invoice).await?;
        }

        let entry = self
            .ledger
            .record(NewLedgerEntry::credit(
                &student.id,
                LedgerEntryType::Discount,
                format!("Discount: {}", reason),
                request.amount,
                date,
                Some(discount_id.clone()),
            ))
            .await?;

        let discount = self
            .discounts
            .create(Discount {
                id: discount_id,
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                amount: request.amount,
                reason,
                status: DiscountStatus::Active,
                applied_by: request.applied_by,
                date,
                invoice_id: request.invoice_id,
                applied_to_invoice,
                ledger_entry_id: Some(entry.id),
                expired_at: None,
                created_at: now,
                updated_at: now,
                version: 0,
            })
            .await?;

        tracing::info!(
            discount_id = %discount.id,
            student_id = %discount.student_id,
            amount = %discount.amount,
            reason = %discount.reason,
            "Discount applied"
        );

        Ok(discount)
    }

    /// Ends an active discount; its ledger credit stays in place
    pub async fn expire(&self, id: &str) -> Result<Discount> {
        let mut discount = self.discounts.require(id).await?;
        discount.expire(self.clock.now())?;
        let discount = self.discounts.update(discount).await?;

        tracing::info!(
            discount_id = %discount.id,
            student_id = %discount.student_id,
            "Discount expired"
        );
        Ok(discount)
    }

    /// Applies the same discount to each listed student in turn
    pub async fn bulk_apply(&self, request: BulkDiscountRequest) -> Result<BulkDiscountOutcome> {
        if request.student_ids.is_empty() {
            return Err(AppError::validation("studentIds cannot be empty"));
        }

        let mut successful = Vec::new();
        let mut failed = Vec::new();

        for student_id in &request.student_ids {
            match self.apply(request.for_student(student_id)).await {
                Ok(discount) => successful.push(discount),
                Err(e) => {
                    tracing::warn!(student_id = %student_id, error = %e, "Bulk discount failed for student");
                    failed.push(BulkDiscountFailure {
                        student_id: student_id.clone(),
                        error: e.kind().to_string(),
                        message: e.message(),
                    });
                }
            }
        }

        let outcome = BulkDiscountOutcome {
            success_count: successful.len(),
            failed_count: failed.len(),
            total_amount: successful.iter().map(|d| d.amount).sum(),
            successful,
            failed,
        };

        tracing::info!(
            success = outcome.success_count,
            failed = outcome.failed_count,
            total_amount = %outcome.total_amount,
            "Bulk discount completed"
        );
        Ok(outcome)
    }

    pub async fn get(&self, id: &str) -> Result<Discount> {
        self.discounts.require(id).await
    }

    /// Newest first
    pub async fn list(&self, filter: DiscountFilter, page: PageRequest) -> Result<Page<Discount>> {
        let mut discounts: Vec<Discount> = self
            .discounts
            .list()
            .await?
            .into_iter()
            .filter(|d| {
                filter.student_id.as_ref().map_or(true, |id| &d.student_id == id)
                    && filter.status.map_or(true, |s| d.status == s)
            })
            .collect();
        discounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Page::from_items(discounts, page))
    }
}
