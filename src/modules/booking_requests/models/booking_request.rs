use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Record, Result};
use crate::modules::rooms::models::RoomType;
use crate::modules::students::models::{validate_contact, FeeConfiguration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Approved => write!(f, "approved"),
            BookingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Admission application, before a student record exists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: String,
    pub applicant_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub preferred_room_type: Option<RoomType>,
    pub check_in_date: NaiveDate,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub rejection_reason: Option<String>,
    /// Student created on approval
    pub student_id: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Record for BookingRequest {
    const COLLECTION: &'static str = "booking_requests";

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub applicant_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub preferred_room_type: Option<RoomType>,
    pub check_in_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBookingRequest {
    pub room_id: String,
    /// Overrides the requested check-in date
    pub check_in_date: Option<NaiveDate>,
    /// When present the student is activated and billed straight away
    pub fee_configuration: Option<FeeConfiguration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectBookingRequest {
    pub reason: String,
}

impl BookingRequest {
    pub fn new(request: CreateBookingRequest, now: DateTime<Utc>) -> Result<Self> {
        let email = request
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        validate_contact(&request.applicant_name, &request.phone, email.as_deref())?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            applicant_name: request.applicant_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            email,
            guardian_name: request.guardian_name,
            guardian_phone: request.guardian_phone,
            preferred_room_type: request.preferred_room_type,
            check_in_date: request.check_in_date,
            notes: request.notes,
            status: BookingStatus::Pending,
            rejection_reason: None,
            student_id: None,
            processed_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Processing is allowed once; a decided booking is a Conflict
    pub fn ensure_pending(&self) -> Result<()> {
        if self.status != BookingStatus::Pending {
            return Err(AppError::conflict(format!(
                "Booking request {} has already been {}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    pub fn approve(&mut self, student_id: &str, now: DateTime<Utc>) -> Result<()> {
        self.ensure_pending()?;
        self.status = BookingStatus::Approved;
        self.student_id = Some(student_id.to_string());
        self.processed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn reject(&mut self, reason: &str, now: DateTime<Utc>) -> Result<()> {
        self.ensure_pending()?;
        if reason.trim().is_empty() {
            return Err(AppError::validation("Rejection reason is required"));
        }
        self.status = BookingStatus::Rejected;
        self.rejection_reason = Some(reason.trim().to_string());
        self.processed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}
