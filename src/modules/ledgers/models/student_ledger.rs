// Student ledger aggregate
//
// All of one student's entries, stored together so that every write can re-sort the
// chain by (date, sequence) and restamp each running balance. A backdated entry or
// an edited amount therefore shifts every later balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger_entry::{validate_sides, BalanceType, LedgerEntry, NewLedgerEntry};
use crate::core::{AppError, Record, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLedger {
    /// Same as the student id
    pub id: String,
    pub entries: Vec<LedgerEntry>,
    pub next_sequence: u64,
    #[serde(default)]
    pub version: u64,
}

impl Record for StudentLedger {
    const COLLECTION: &'static str = "student_ledgers";

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

/// Changes allowed on an existing entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLedgerEntry {
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub description: Option<String>,
}

impl StudentLedger {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            id: student_id.into(),
            entries: Vec::new(),
            next_sequence: 1,
            version: 0,
        }
    }

    pub fn student_id(&self) -> &str {
        &self.id
    }

    /// Appends an entry and restamps the chain; returns the stored entry
    pub fn append(&mut self, entry: NewLedgerEntry, now: DateTime<Utc>) -> Result<LedgerEntry> {
        entry.validate()?;

        if entry.student_id != self.id {
            return Err(AppError::internal(format!(
                "Entry for student {} appended to ledger of {}",
                entry.student_id, self.id
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.entries.push(LedgerEntry {
            id: id.clone(),
            student_id: entry.student_id,
            entry_type: entry.entry_type,
            description: entry.description.trim().to_string(),
            debit: entry.debit,
            credit: entry.credit,
            date: entry.date,
            sequence: self.next_sequence,
            reference_id: entry.reference_id,
            balance: Decimal::ZERO,
            balance_type: BalanceType::Nil,
            created_at: now,
            updated_at: now,
        });
        self.next_sequence += 1;
        self.recompute();

        self.entry(&id)
    }

    /// Changes an entry's amounts or description and restamps the chain
    pub fn edit(
        &mut self,
        entry_id: &str,
        changes: EditLedgerEntry,
        now: DateTime<Utc>,
    ) -> Result<LedgerEntry> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| AppError::not_found(format!("Ledger entry {}", entry_id)))?;

        let debit = changes.debit.unwrap_or(entry.debit);
        let credit = changes.credit.unwrap_or(entry.credit);
        validate_sides(debit, credit)?;

        if let Some(description) = &changes.description {
            if description.trim().is_empty() {
                return Err(AppError::validation("Ledger entry description cannot be empty"));
            }
            entry.description = description.trim().to_string();
        }

        entry.debit = debit;
        entry.credit = credit;
        entry.updated_at = now;
        self.recompute();

        self.entry(entry_id)
    }

    /// Sorts by (date, sequence) and restamps every running balance
    pub fn recompute(&mut self) {
        self.entries.sort_by(|a, b| (a.date, a.sequence).cmp(&(b.date, b.sequence)));

        let mut running = Decimal::ZERO;
        for entry in &mut self.entries {
            running += entry.net();
            entry.balance = running;
            entry.balance_type = BalanceType::of(running);
        }
    }

    /// Signed balance after the last entry
    pub fn balance(&self) -> Decimal {
        self.entries.last().map(|e| e.balance).unwrap_or(Decimal::ZERO)
    }

    pub fn entry(&self, entry_id: &str) -> Result<LedgerEntry> {
        self.entries
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Ledger entry {}", entry_id)))
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.entries.iter().any(|e| e.id == entry_id)
    }
}
