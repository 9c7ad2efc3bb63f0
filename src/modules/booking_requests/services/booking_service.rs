use std::sync::Arc;

use serde::Serialize;

use crate::core::{Clock, KeyedLocks, Notification, Notifier, Page, PageRequest, Result};
use crate::modules::booking_requests::models::{
    ApproveBookingRequest, BookingRequest, BookingStatus, CreateBookingRequest,
    RejectBookingRequest,
};
use crate::modules::booking_requests::repositories::BookingRepository;
use crate::modules::invoices::models::Invoice;
use crate::modules::students::models::{NewStudent, Student};
use crate::modules::students::services::StudentService;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    pub booking_request: BookingRequest,
    pub student: Student,
    /// Enrollment invoice, issued when fees were supplied with the approval
    pub invoice: Option<Invoice>,
}

pub struct BookingService {
    bookings: BookingRepository,
    students: Arc<StudentService>,
    locks: KeyedLocks,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl BookingService {
    pub fn new(
        bookings: BookingRepository,
        students: Arc<StudentService>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            bookings,
            students,
            locks: KeyedLocks::new(),
            clock,
            notifier,
        }
    }

    pub async fn create(&self, request: CreateBookingRequest) -> Result<BookingRequest> {
        let booking = BookingRequest::new(request, self.clock.now())?;
        let booking = self.bookings.create(booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            check_in_date = %booking.check_in_date,
            "Booking request received"
        );
        Ok(booking)
    }

    pub async fn get(&self, id: &str) -> Result<BookingRequest> {
        self.bookings.require(id).await
    }

    /// Newest first
    pub async fn list(
        &self,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> Result<Page<BookingRequest>> {
        let mut bookings: Vec<BookingRequest> = self
            .bookings
            .list()
            .await?
            .into_iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Page::from_items(bookings, page))
    }

    /// Turns a pending booking into an enrolled student in the chosen room
    pub async fn approve(&self, id: &str, request: ApproveBookingRequest) -> Result<ApprovalOutcome> {
        let _guard = self.locks.acquire(id).await;
        let mut booking = self.bookings.require(id).await?;
        booking.ensure_pending()?;

        let (student, invoice) = self
            .students
            .enroll(
                NewStudent {
                    name: booking.applicant_name.clone(),
                    phone: booking.phone.clone(),
                    email: booking.email.clone(),
                    guardian_name: booking.guardian_name.clone(),
                    guardian_phone: booking.guardian_phone.clone(),
                    enrollment_date: request.check_in_date.unwrap_or(booking.check_in_date),
                    booking_request_id: Some(booking.id.clone()),
                    fee_configuration: request.fee_configuration,
                },
                &request.room_id,
            )
            .await?;

        booking.approve(&student.id, self.clock.now())?;
        let booking = self.bookings.update(booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            student_id = %student.id,
            "Booking request approved"
        );
        self.notifier.notify(Notification::BookingApproved {
            booking_id: booking.id.clone(),
            student_id: student.id.clone(),
            room_number: student.room_number.clone().unwrap_or_default(),
        });

        Ok(ApprovalOutcome {
            booking_request: booking,
            student,
            invoice,
        })
    }

    pub async fn reject(&self, id: &str, request: RejectBookingRequest) -> Result<BookingRequest> {
        let _guard = self.locks.acquire(id).await;
        let mut booking = self.bookings.require(id).await?;
        booking.reject(&request.reason, self.clock.now())?;
        let booking = self.bookings.update(booking).await?;

        tracing::info!(booking_id = %booking.id, "Booking request rejected");
        self.notifier.notify(Notification::BookingRejected {
            booking_id: booking.id.clone(),
            reason: request.reason.trim().to_string(),
        });

        Ok(booking)
    }
}
