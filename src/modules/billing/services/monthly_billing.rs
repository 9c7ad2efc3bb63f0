// Monthly billing cycle
//
// Bills every eligible student once for the target month. Students already invoiced
// for the month are skipped, so the run can be repeated safely. A failure for one
// student is recorded and the batch carries on.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AppError, Result};
use crate::modules::billing::models::{BillingMonth, BillingTrigger};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::invoices::services::InvoiceService;
use crate::modules::students::models::{Student, StudentStatus};
use crate::modules::students::repositories::StudentRepository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BilledInvoice {
    pub student_id: String,
    pub student_name: String,
    pub invoice_id: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingFailure {
    pub student_id: String,
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSkip {
    pub student_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBillingOutcome {
    pub month: BillingMonth,
    pub successful: Vec<BilledInvoice>,
    pub failed: Vec<BillingFailure>,
    pub skipped: Vec<BillingSkip>,
    pub success_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    pub total_billed: Decimal,
}

impl MonthlyBillingOutcome {
    fn new(month: BillingMonth) -> Self {
        Self {
            month,
            successful: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            success_count: 0,
            failed_count: 0,
            skipped_count: 0,
            total_billed: Decimal::ZERO,
        }
    }

    fn fail(&mut self, student_id: &str, err: &AppError) {
        self.failed.push(BillingFailure {
            student_id: student_id.to_string(),
            error: err.kind().to_string(),
            message: err.message(),
        });
    }

    fn skip(&mut self, student_id: &str, reason: impl Into<String>) {
        self.skipped.push(BillingSkip {
            student_id: student_id.to_string(),
            reason: reason.into(),
        });
    }

    fn finish(mut self) -> Self {
        self.success_count = self.successful.len();
        self.failed_count = self.failed.len();
        self.skipped_count = self.skipped.len();
        self.total_billed = self.successful.iter().map(|b| b.total).sum();
        self
    }
}

pub struct MonthlyBillingService {
    students: StudentRepository,
    invoices: InvoiceRepository,
    invoice_service: Arc<InvoiceService>,
}

impl MonthlyBillingService {
    pub fn new(
        students: StudentRepository,
        invoices: InvoiceRepository,
        invoice_service: Arc<InvoiceService>,
    ) -> Self {
        Self {
            students,
            invoices,
            invoice_service,
        }
    }

    /// Runs the cycle for `month`, over all students or only the listed ones
    ///
    /// Without a list, ineligible students are left out silently. Listed students that
    /// are ineligible are reported as skipped; unknown ids are reported as failed.
    pub async fn run(
        &self,
        month: BillingMonth,
        student_ids: Option<Vec<String>>,
    ) -> Result<MonthlyBillingOutcome> {
        let mut outcome = MonthlyBillingOutcome::new(month);
        let last_day = month.last_day();

        let candidates: Vec<Student> = match student_ids {
            Some(ids) => {
                let mut selected = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.students.require(&id).await {
                        Ok(student) => match ineligibility(&student, month) {
                            Some(reason) => outcome.skip(&id, reason),
                            None => selected.push(student),
                        },
                        Err(e) => outcome.fail(&id, &e),
                    }
                }
                selected
            }
            None => self
                .students
                .list()
                .await?
                .into_iter()
                .filter(|s| s.is_billable_on(last_day))
                .collect(),
        };

        tracing::info!(
            month = %month,
            candidates = candidates.len(),
            "Starting monthly billing"
        );

        for student in candidates {
            match self.invoices.find_for_student_month(&student.id, month).await {
                Ok(Some(existing)) => {
                    outcome.skip(
                        &student.id,
                        format!("Already invoiced for {} (invoice {})", month, existing.id),
                    );
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    outcome.fail(&student.id, &e);
                    continue;
                }
            }

            match self
                .invoice_service
                .bill_student(&student, BillingTrigger::MonthlyCycle(month))
                .await
            {
                Ok(invoice) => outcome.successful.push(BilledInvoice {
                    student_id: student.id.clone(),
                    student_name: student.name.clone(),
                    invoice_id: invoice.id,
                    total: invoice.total,
                }),
                Err(AppError::Conflict(msg)) => outcome.skip(&student.id, msg),
                Err(e) => {
                    tracing::warn!(
                        student_id = %student.id,
                        month = %month,
                        error = %e,
                        "Monthly billing failed for student"
                    );
                    outcome.fail(&student.id, &e);
                }
            }
        }

        let outcome = outcome.finish();
        tracing::info!(
            month = %month,
            success = outcome.success_count,
            failed = outcome.failed_count,
            skipped = outcome.skipped_count,
            total_billed = %outcome.total_billed,
            "Monthly billing completed"
        );

        Ok(outcome)
    }
}

fn ineligibility(student: &Student, month: BillingMonth) -> Option<String> {
    match student.status {
        StudentStatus::CheckedOut => Some("Student has checked out".to_string()),
        StudentStatus::PendingConfiguration => {
            Some("Student has no fee configuration".to_string())
        }
        StudentStatus::Active if student.enrollment_date > month.last_day() => Some(format!(
            "Student enrolled on {}, after {}",
            student.enrollment_date, month
        )),
        StudentStatus::Active => None,
    }
}
