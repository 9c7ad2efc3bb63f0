use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::validate_positive;
use crate::core::{AppError, Result};

/// Kind of document a ledger entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerEntryType {
    Invoice,
    Payment,
    Discount,
    Adjustment,
    #[serde(rename = "Manual Charge")]
    ManualCharge,
    #[serde(rename = "Checkout Credit")]
    CheckoutCredit,
}

impl std::fmt::Display for LedgerEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LedgerEntryType::Invoice => "Invoice",
            LedgerEntryType::Payment => "Payment",
            LedgerEntryType::Discount => "Discount",
            LedgerEntryType::Adjustment => "Adjustment",
            LedgerEntryType::ManualCharge => "Manual Charge",
            LedgerEntryType::CheckoutCredit => "Checkout Credit",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for LedgerEntryType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Invoice" => Ok(LedgerEntryType::Invoice),
            "Payment" => Ok(LedgerEntryType::Payment),
            "Discount" => Ok(LedgerEntryType::Discount),
            "Adjustment" => Ok(LedgerEntryType::Adjustment),
            "Manual Charge" => Ok(LedgerEntryType::ManualCharge),
            "Checkout Credit" => Ok(LedgerEntryType::CheckoutCredit),
            _ => Err(AppError::validation(format!("Invalid ledger entry type: {}", s))),
        }
    }
}

/// Sign of a running balance: `Dr` owes, `Cr` holds credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceType {
    Dr,
    Cr,
    Nil,
}

impl BalanceType {
    pub fn of(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            BalanceType::Dr
        } else if balance < Decimal::ZERO {
            BalanceType::Cr
        } else {
            BalanceType::Nil
        }
    }
}

/// A single debit-or-credit line in a student's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub student_id: String,
    pub entry_type: LedgerEntryType,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub date: NaiveDate,
    /// Insertion order within the student's ledger; breaks ties between same-day entries
    pub sequence: u64,
    pub reference_id: Option<String>,
    /// Running `sum(debit) - sum(credit)` up to and including this entry
    pub balance: Decimal,
    pub balance_type: BalanceType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Signed effect on the balance
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// An entry about to be appended
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub student_id: String,
    pub entry_type: LedgerEntryType,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub date: NaiveDate,
    pub reference_id: Option<String>,
}

impl NewLedgerEntry {
    pub fn debit(
        student_id: impl Into<String>,
        entry_type: LedgerEntryType,
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        reference_id: Option<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            entry_type,
            description: description.into(),
            debit: amount,
            credit: Decimal::ZERO,
            date,
            reference_id,
        }
    }

    pub fn credit(
        student_id: impl Into<String>,
        entry_type: LedgerEntryType,
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        reference_id: Option<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            entry_type,
            description: description.into(),
            debit: Decimal::ZERO,
            credit: amount,
            date,
            reference_id,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_sides(self.debit, self.credit)?;

        if self.description.trim().is_empty() {
            return Err(AppError::validation("Ledger entry description cannot be empty"));
        }

        Ok(())
    }
}

/// Exactly one side positive, the other zero
pub(crate) fn validate_sides(debit: Decimal, credit: Decimal) -> Result<()> {
    match (debit.is_zero(), credit.is_zero()) {
        (false, true) => validate_positive("debit", debit),
        (true, false) => validate_positive("credit", credit),
        (true, true) => Err(AppError::validation(
            "Ledger entry must have a debit or a credit",
        )),
        (false, false) => Err(AppError::validation(
            "Ledger entry cannot have both a debit and a credit",
        )),
    }
}
