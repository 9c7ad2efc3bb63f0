// Dashboard figures derived from the current state of every aggregate

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::money::percentage;
use crate::core::{AppError, Clock, Result};
use crate::modules::billing::models::BillingMonth;
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::rooms::services::RoomService;
use crate::modules::students::models::{Student, StudentStatus};
use crate::modules::students::repositories::StudentRepository;

pub const MAX_TREND_MONTHS: u32 = 24;
const TOP_DEBTORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCounts {
    pub total: usize,
    pub active: usize,
    pub pending_configuration: usize,
    pub checked_out: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub total_rooms: usize,
    pub total_capacity: u32,
    pub occupied_beds: u32,
    pub occupancy_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFigures {
    pub month: BillingMonth,
    pub invoiced: Decimal,
    pub collected: Decimal,
    pub collection_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Debtor {
    pub student_id: String,
    pub student_name: String,
    pub room_number: Option<String>,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub students: StudentCounts,
    pub rooms: RoomOccupancy,
    pub current_month: MonthFigures,
    pub total_outstanding: Decimal,
    pub total_advance: Decimal,
    pub top_debtors: Vec<Debtor>,
}

pub struct AnalyticsService {
    students: StudentRepository,
    invoices: InvoiceRepository,
    payments: PaymentRepository,
    rooms: Arc<RoomService>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(
        students: StudentRepository,
        invoices: InvoiceRepository,
        payments: PaymentRepository,
        rooms: Arc<RoomService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            students,
            invoices,
            payments,
            rooms,
            clock,
        }
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let students = self.students.list().await?;
        let rooms = self.rooms.all().await?;
        let invoices = self.invoices.list().await?;
        let payments = self.payments.list().await?;
        let month = BillingMonth::from_date(self.clock.today());

        let total_capacity: u32 = rooms.iter().map(|r| r.capacity).sum();
        let occupied_beds: u32 = rooms.iter().map(|r| r.occupancy()).sum();

        Ok(Dashboard {
            students: count_students(&students),
            rooms: RoomOccupancy {
                total_rooms: rooms.len(),
                total_capacity,
                occupied_beds,
                occupancy_rate: percentage(occupied_beds.into(), total_capacity.into()),
            },
            current_month: month_figures(month, &invoices, &payments),
            total_outstanding: students.iter().map(|s| s.current_balance).sum(),
            total_advance: students.iter().map(|s| s.advance_balance).sum(),
            top_debtors: top_debtors(&students, TOP_DEBTORS),
        })
    }

    /// Invoiced vs collected for the last `months` months, oldest first
    pub async fn collection_trend(&self, months: u32) -> Result<Vec<MonthFigures>> {
        if months < 1 || months > MAX_TREND_MONTHS {
            return Err(AppError::validation(format!(
                "months must be between 1 and {}",
                MAX_TREND_MONTHS
            )));
        }

        let invoices = self.invoices.list().await?;
        let payments = self.payments.list().await?;

        let mut month = BillingMonth::from_date(self.clock.today());
        let mut trend = Vec::with_capacity(months as usize);
        for _ in 0..months {
            trend.push(month_figures(month, &invoices, &payments));
            month = month.previous();
        }
        trend.reverse();

        Ok(trend)
    }
}

fn count_students(students: &[Student]) -> StudentCounts {
    let with_status = |status: StudentStatus| students.iter().filter(|s| s.status == status).count();
    StudentCounts {
        total: students.len(),
        active: with_status(StudentStatus::Active),
        pending_configuration: with_status(StudentStatus::PendingConfiguration),
        checked_out: with_status(StudentStatus::CheckedOut),
    }
}

/// Invoices billed for `month` against payments dated in it
pub fn month_figures(month: BillingMonth, invoices: &[Invoice], payments: &[Payment]) -> MonthFigures {
    let in_month = |date: NaiveDate| month.contains(date);

    let invoiced: Decimal = invoices
        .iter()
        .filter(|i| i.billing_month == month)
        .map(|i| i.total)
        .sum();
    let collected: Decimal = payments
        .iter()
        .filter(|p| in_month(p.payment_date))
        .map(|p| p.amount)
        .sum();

    MonthFigures {
        month,
        invoiced,
        collected,
        collection_rate: percentage(collected, invoiced),
    }
}

/// Students owing the most, largest balance first
pub fn top_debtors(students: &[Student], limit: usize) -> Vec<Debtor> {
    let mut debtors: Vec<Debtor> = students
        .iter()
        .filter(|s| s.current_balance > Decimal::ZERO)
        .map(|s| Debtor {
            student_id: s.id.clone(),
            student_name: s.name.clone(),
            room_number: s.room_number.clone(),
            balance: s.current_balance,
        })
        .collect();
    debtors.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.student_name.cmp(&b.student_name)));
    debtors.truncate(limit);
    debtors
}
