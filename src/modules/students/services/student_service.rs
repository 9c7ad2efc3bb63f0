use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AppError, Clock, Page, PageRequest, Result};
use crate::modules::billing::models::{BillingMonth, BillingTrigger};
use crate::modules::billing::services::calculate_prorated_amount;
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::invoices::services::InvoiceService;
use crate::modules::ledgers::models::{LedgerEntry, LedgerEntryType, NewLedgerEntry};
use crate::modules::ledgers::services::{BalanceSummary, LedgerService};
use crate::modules::rooms::services::RoomService;
use crate::modules::students::models::{
    validate_contact, FeeConfiguration, NewStudent, Student, StudentStatus, UpdateStudentRequest,
};
use crate::modules::students::repositories::StudentRepository;

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub status: Option<StudentStatus>,
    pub room_id: Option<String>,
    /// Case-insensitive match on name, phone or email
    pub search: Option<String>,
}

impl StudentFilter {
    fn matches(&self, student: &Student) -> bool {
        let search = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        self.status.map_or(true, |s| student.status == s)
            && self
                .room_id
                .as_ref()
                .map_or(true, |r| student.room_id.as_ref() == Some(r))
            && search.map_or(true, |needle| {
                student.name.to_lowercase().contains(&needle)
                    || student.phone.contains(&needle)
                    || student
                        .email
                        .as_deref()
                        .map_or(false, |e| e.to_lowercase().contains(&needle))
            })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfigurationOutcome {
    pub student: Student,
    /// Issued when the student was waiting for a fee configuration
    pub invoice: Option<Invoice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub student: Student,
    /// Final invoice when the checkout month had not been billed yet
    pub invoice: Option<Invoice>,
    /// Refund of unused days when the checkout month was already billed
    pub credit: Option<LedgerEntry>,
    pub balance: BalanceSummary,
}

pub struct StudentService {
    students: StudentRepository,
    invoices: InvoiceRepository,
    rooms: Arc<RoomService>,
    invoice_service: Arc<InvoiceService>,
    ledger: Arc<LedgerService>,
    clock: Arc<dyn Clock>,
}

impl StudentService {
    pub fn new(
        students: StudentRepository,
        invoices: InvoiceRepository,
        rooms: Arc<RoomService>,
        invoice_service: Arc<InvoiceService>,
        ledger: Arc<LedgerService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            students,
            invoices,
            rooms,
            invoice_service,
            ledger,
            clock,
        }
    }

    /// Creates the student, gives them a bed in `room_id` and, when fees are known,
    /// issues the enrollment invoice
    ///
    /// An enrollment whose first period prorates to nothing is accepted without an
    /// invoice. If issuing the invoice fails, the student and the bed are released
    /// again before the error is returned.
    pub async fn enroll(&self, input: NewStudent, room_id: &str) -> Result<(Student, Option<Invoice>)> {
        let mut student = Student::new(input, self.clock.now())?;

        let trigger = BillingTrigger::Enrollment(student.enrollment_date);
        let bills_now = student.status == StudentStatus::Active
            && self
                .invoice_service
                .builder()
                .draft(&student, trigger, self.clock.now())?
                .is_some();

        let room = self.rooms.assign(room_id, &student.id).await?;
        student.room_id = Some(room.id.clone());
        student.room_number = Some(room.room_number.clone());

        let student_id = student.id.clone();
        let student = match self.students.create(student).await {
            Ok(student) => student,
            Err(e) => {
                self.rooms.vacate(&room.id, &student_id).await?;
                return Err(e);
            }
        };

        tracing::info!(
            student_id = %student.id,
            room_number = %room.room_number,
            status = %student.status,
            "Student enrolled"
        );

        let invoice = if bills_now {
            match self.invoice_service.bill_student(&student, trigger).await {
                Ok(invoice) => Some(invoice),
                Err(e) => {
                    self.undo_enrollment(&student.id, &room.id).await;
                    return Err(e);
                }
            }
        } else {
            None
        };

        Ok((self.students.require(&student.id).await?, invoice))
    }

    async fn undo_enrollment(&self, student_id: &str, room_id: &str) {
        if let Err(e) = self.students.delete(student_id).await {
            tracing::error!(student_id = %student_id, error = %e, "Failed to remove student after enrollment error");
        }
        if let Err(e) = self.rooms.vacate(room_id, student_id).await {
            tracing::error!(student_id = %student_id, room_id = %room_id, error = %e, "Failed to free bed after enrollment error");
        }
        tracing::warn!(student_id = %student_id, "Enrollment rolled back");
    }

    pub async fn get(&self, id: &str) -> Result<Student> {
        self.students.require(id).await
    }

    /// Filtered students ordered by name
    pub async fn list(&self, filter: StudentFilter, page: PageRequest) -> Result<Page<Student>> {
        let mut students: Vec<Student> = self
            .students
            .list()
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();
        students.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(Page::from_items(students, page))
    }

    pub async fn update(&self, id: &str, request: UpdateStudentRequest) -> Result<Student> {
        let mut student = self.students.require(id).await?;

        if let Some(name) = request.name {
            student.name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            student.phone = phone.trim().to_string();
        }
        if let Some(email) = request.email {
            let email = email.trim().to_string();
            student.email = if email.is_empty() { None } else { Some(email) };
        }
        if let Some(guardian_name) = request.guardian_name {
            student.guardian_name = Some(guardian_name);
        }
        if let Some(guardian_phone) = request.guardian_phone {
            student.guardian_phone = Some(guardian_phone);
        }
        validate_contact(&student.name, &student.phone, student.email.as_deref())?;

        student.updated_at = self.clock.now();
        self.students.update(student).await
    }

    /// Sets a student's fees
    ///
    /// A student waiting for configuration becomes active and is billed from the
    /// enrollment date, unless that period prorates to nothing. A failed invoice puts
    /// the student back to waiting. For an active student the new fees apply from the
    /// next cycle.
    pub async fn configure_fees(&self, id: &str, fees: FeeConfiguration) -> Result<FeeConfigurationOutcome> {
        fees.validate()?;
        let mut student = self.students.require(id).await?;

        match student.status {
            StudentStatus::CheckedOut => Err(AppError::validation(format!(
                "Student {} has checked out",
                id
            ))),
            StudentStatus::PendingConfiguration => {
                student.fee_configuration = Some(fees);
                student.status = StudentStatus::Active;
                student.updated_at = self.clock.now();

                let trigger = BillingTrigger::ConfigurationChange(student.enrollment_date);
                let bills_now = self
                    .invoice_service
                    .builder()
                    .draft(&student, trigger, self.clock.now())?
                    .is_some();

                let student = self.students.update(student).await?;

                tracing::info!(student_id = %id, "Fee configuration set; student activated");

                let invoice = if bills_now {
                    match self.invoice_service.bill_student(&student, trigger).await {
                        Ok(invoice) => Some(invoice),
                        Err(e) => {
                            self.restore_pending(id).await;
                            return Err(e);
                        }
                    }
                } else {
                    None
                };

                Ok(FeeConfigurationOutcome {
                    student: self.students.require(id).await?,
                    invoice,
                })
            }
            StudentStatus::Active => {
                student.fee_configuration = Some(fees);
                student.updated_at = self.clock.now();
                let student = self.students.update(student).await?;

                tracing::info!(student_id = %id, "Fee configuration replaced");

                Ok(FeeConfigurationOutcome {
                    student,
                    invoice: None,
                })
            }
        }
    }

    async fn restore_pending(&self, id: &str) {
        let restored = match self.students.require(id).await {
            Ok(mut student) => {
                student.fee_configuration = None;
                student.status = StudentStatus::PendingConfiguration;
                student.updated_at = self.clock.now();
                self.students.update(student).await.map(|_| ())
            }
            Err(e) => Err(e),
        };

        match restored {
            Ok(()) => tracing::warn!(student_id = %id, "Fee configuration rolled back"),
            Err(e) => {
                tracing::error!(student_id = %id, error = %e, "Failed to roll back fee configuration")
            }
        }
    }

    /// Settles the checkout month, frees the room and closes the student record
    ///
    /// An unbilled checkout month that prorates to nothing gets no final invoice.
    pub async fn checkout(&self, id: &str, checkout_date: NaiveDate) -> Result<CheckoutOutcome> {
        let student = self.students.require(id).await?;

        if student.is_checked_out() {
            return Err(AppError::validation(format!(
                "Student {} has already checked out",
                id
            )));
        }
        if checkout_date < student.enrollment_date {
            return Err(AppError::validation(format!(
                "Checkout date {} is before enrollment date {}",
                checkout_date, student.enrollment_date
            )));
        }

        let mut invoice = None;
        let mut credit = None;

        if student.status == StudentStatus::Active {
            let month = BillingMonth::from_date(checkout_date);
            match self.invoices.find_for_student_month(id, month).await? {
                Some(billed) => {
                    let unused = unused_amount(&billed, checkout_date)?;
                    if unused > Decimal::ZERO {
                        credit = Some(
                            self.ledger
                                .record(NewLedgerEntry::credit(
                                    id,
                                    LedgerEntryType::CheckoutCredit,
                                    format!("Unused days after checkout on {}", checkout_date),
                                    unused,
                                    checkout_date,
                                    Some(billed.id.clone()),
                                ))
                                .await?,
                        );
                    }
                }
                None => {
                    let trigger = BillingTrigger::Checkout(checkout_date);
                    let bills_now = self
                        .invoice_service
                        .builder()
                        .draft(&student, trigger, self.clock.now())?
                        .is_some();
                    if bills_now {
                        invoice = Some(self.invoice_service.bill_student(&student, trigger).await?);
                    }
                }
            }
        }

        if let Some(room_id) = &student.room_id {
            self.rooms.vacate(room_id, id).await?;
        }

        // Ledger writes above refreshed the balance fields, so start from the stored copy
        let mut student = self.students.require(id).await?;
        student.status = StudentStatus::CheckedOut;
        student.checkout_date = Some(checkout_date);
        student.updated_at = self.clock.now();
        let student = self.students.update(student).await?;

        let balance = self.ledger.summary(id).await?;

        tracing::info!(
            student_id = %id,
            checkout_date = %checkout_date,
            final_balance = %balance.net_balance,
            "Student checked out"
        );

        Ok(CheckoutOutcome {
            student,
            invoice,
            credit,
            balance,
        })
    }

    pub async fn balance(&self, id: &str) -> Result<BalanceSummary> {
        self.students.require(id).await?;
        self.ledger.summary(id).await
    }
}

/// Billed amount for the days after `checkout_date`, line by line
///
/// Each line is re-prorated from the invoice's period start to the checkout date; the
/// difference to what was billed is the unused part.
fn unused_amount(invoice: &Invoice, checkout_date: NaiveDate) -> Result<Decimal> {
    if checkout_date >= invoice.period_end {
        return Ok(Decimal::ZERO);
    }
    if checkout_date < invoice.period_start {
        return Ok(invoice.total);
    }

    let mut unused = Decimal::ZERO;
    for line in &invoice.line_items {
        let used = calculate_prorated_amount(
            line.monthly_amount,
            invoice.period_start,
            Some(checkout_date),
        )?;
        unused += (line.amount - used.prorated_amount).max(Decimal::ZERO);
    }

    Ok(unused)
}
