// Student record and fee configuration
//
// A student is created when a booking request is approved. Billing needs a fee
// configuration; until one is set the student stays in `pending_configuration` and is
// skipped by monthly billing. Checkout is the only way a student leaves the system.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::validate_fee;
use crate::core::{AppError, FieldErrors, Record, Result};

/// Student lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Enrolled without fees; not billable yet
    PendingConfiguration,
    Active,
    CheckedOut,
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::PendingConfiguration => write!(f, "pending_configuration"),
            StudentStatus::Active => write!(f, "active"),
            StudentStatus::CheckedOut => write!(f, "checked_out"),
        }
    }
}

/// Extra recurring charge billed alongside the standard fees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCharge {
    pub description: String,
    pub amount: Decimal,
}

/// Fee category of an invoice line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeCategory {
    Accommodation,
    Laundry,
    Food,
    Additional,
}

/// Monthly fees a student is billed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfiguration {
    pub base_monthly_fee: Decimal,
    #[serde(default)]
    pub laundry_fee: Decimal,
    #[serde(default)]
    pub food_fee: Decimal,
    #[serde(default)]
    pub additional_charges: Vec<AdditionalCharge>,
}

impl FeeConfiguration {
    pub fn validate(&self) -> Result<()> {
        validate_fee("baseMonthlyFee", self.base_monthly_fee)?;
        validate_fee("laundryFee", self.laundry_fee)?;
        validate_fee("foodFee", self.food_fee)?;

        for charge in &self.additional_charges {
            if charge.description.trim().is_empty() {
                return Err(AppError::validation(
                    "Additional charge description cannot be empty",
                ));
            }
            validate_fee("additionalCharges.amount", charge.amount)?;
        }

        if self.monthly_total().is_zero() {
            return Err(AppError::validation(
                "Fee configuration must contain at least one non-zero fee",
            ));
        }

        Ok(())
    }

    /// Every non-zero fee as `(description, category, monthly amount)`, in billing order
    pub fn components(&self) -> Vec<(String, FeeCategory, Decimal)> {
        let mut components = vec![
            (
                "Accommodation".to_string(),
                FeeCategory::Accommodation,
                self.base_monthly_fee,
            ),
            ("Laundry".to_string(), FeeCategory::Laundry, self.laundry_fee),
            ("Food".to_string(), FeeCategory::Food, self.food_fee),
        ];

        components.extend(self.additional_charges.iter().map(|charge| {
            (
                charge.description.trim().to_string(),
                FeeCategory::Additional,
                charge.amount,
            )
        }));

        components.retain(|(_, _, amount)| !amount.is_zero());
        components
    }

    pub fn monthly_total(&self) -> Decimal {
        self.base_monthly_fee
            + self.laundry_fee
            + self.food_fee
            + self
                .additional_charges
                .iter()
                .map(|c| c.amount)
                .sum::<Decimal>()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub room_id: Option<String>,
    pub room_number: Option<String>,
    pub fee_configuration: Option<FeeConfiguration>,
    pub status: StudentStatus,
    pub enrollment_date: NaiveDate,
    pub checkout_date: Option<NaiveDate>,
    pub booking_request_id: Option<String>,
    /// Amount owed, never negative
    pub current_balance: Decimal,
    /// Credit held in advance, never negative
    pub advance_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Record for Student {
    const COLLECTION: &'static str = "students";

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

/// Everything needed to enroll a student
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub enrollment_date: NaiveDate,
    pub booking_request_id: Option<String>,
    pub fee_configuration: Option<FeeConfiguration>,
}

impl Student {
    pub fn new(input: NewStudent, now: DateTime<Utc>) -> Result<Self> {
        validate_contact(&input.name, &input.phone, input.email.as_deref())?;

        if let Some(fees) = &input.fee_configuration {
            fees.validate()?;
        }

        let status = if input.fee_configuration.is_some() {
            StudentStatus::Active
        } else {
            StudentStatus::PendingConfiguration
        };

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            email: input.email.map(|e| e.trim().to_string()),
            guardian_name: input.guardian_name,
            guardian_phone: input.guardian_phone,
            room_id: None,
            room_number: None,
            fee_configuration: input.fee_configuration,
            status,
            enrollment_date: input.enrollment_date,
            checkout_date: None,
            booking_request_id: input.booking_request_id,
            current_balance: Decimal::ZERO,
            advance_balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn is_checked_out(&self) -> bool {
        self.status == StudentStatus::CheckedOut
    }

    /// Active, fee-configured and enrolled on or before `date`
    pub fn is_billable_on(&self, date: NaiveDate) -> bool {
        self.status == StudentStatus::Active
            && self.fee_configuration.is_some()
            && self.enrollment_date <= date
    }

    pub fn require_fees(&self) -> Result<&FeeConfiguration> {
        if self.is_checked_out() {
            return Err(AppError::validation(format!(
                "Student {} has checked out",
                self.id
            )));
        }

        self.fee_configuration.as_ref().ok_or_else(|| {
            AppError::validation(format!(
                "Student {} has no fee configuration",
                self.id
            ))
        })
    }

    /// Splits a signed ledger balance into owed and advance amounts
    pub fn set_balance(&mut self, net_balance: Decimal, now: DateTime<Utc>) {
        self.current_balance = net_balance.max(Decimal::ZERO);
        self.advance_balance = (-net_balance).max(Decimal::ZERO);
        self.updated_at = now;
    }
}

pub(crate) fn validate_contact(name: &str, phone: &str, email: Option<&str>) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors.check(!name.trim().is_empty(), "name", "Name is required");
    errors.check(name.len() <= 100, "name", "Name must be at most 100 characters");
    errors.check(is_valid_phone(phone), "phone", "Phone must contain 7 to 15 digits");
    if let Some(email) = email {
        errors.check(is_valid_email(email), "email", "Email address is invalid");
    }
    errors.into_result()
}

fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (7..=15).contains(&digits)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !email.contains(' ')
        }
        None => false,
    }
}

/// Contact details that can be corrected after enrollment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub checkout_date: NaiveDate,
}
