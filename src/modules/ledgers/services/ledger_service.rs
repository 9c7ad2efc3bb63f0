use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Clock, KeyedLocks, Page, PageRequest, Result};
use crate::modules::ledgers::models::{
    EditLedgerEntry, LedgerEntry, LedgerEntryType, NewLedgerEntry,
};
use crate::modules::ledgers::repositories::LedgerRepository;
use crate::modules::ledgers::services::balance_aggregator::{summarize, BalanceSummary};
use crate::modules::students::repositories::StudentRepository;

/// Attempts at refreshing the student's balance fields when another writer got there first
const BALANCE_SYNC_ATTEMPTS: usize = 3;

/// Filters for the cross-student entry listing
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub student_id: Option<String>,
    pub entry_type: Option<LedgerEntryType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Staff-entered adjustment or charge
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntryRequest {
    pub student_id: String,
    pub entry_type: LedgerEntryType,
    pub description: String,
    #[serde(default)]
    pub debit: Decimal,
    #[serde(default)]
    pub credit: Decimal,
    pub date: Option<NaiveDate>,
    pub reference_id: Option<String>,
}

/// A student's entries with their summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLedgerView {
    pub student_id: String,
    pub student_name: String,
    pub entries: Page<LedgerEntry>,
    pub summary: BalanceSummary,
}

/// Records ledger entries and keeps the student's balance fields in step
pub struct LedgerService {
    ledgers: LedgerRepository,
    students: StudentRepository,
    locks: KeyedLocks,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(ledgers: LedgerRepository, students: StudentRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledgers,
            students,
            locks: KeyedLocks::new(),
            clock,
        }
    }

    /// Appends an entry to the student's ledger and refreshes the student's balance
    pub async fn record(&self, entry: NewLedgerEntry) -> Result<LedgerEntry> {
        entry.validate()?;
        let student_id = entry.student_id.clone();
        let _guard = self.locks.acquire(&student_id).await;

        let mut ledger = self.ledgers.load_or_new(&student_id).await?;
        let stored = ledger.append(entry, self.clock.now())?;
        let ledger = self.ledgers.save(ledger).await?;

        tracing::info!(
            student_id = %student_id,
            entry_id = %stored.id,
            entry_type = %stored.entry_type,
            debit = %stored.debit,
            credit = %stored.credit,
            balance = %stored.balance,
            "Ledger entry recorded"
        );

        self.sync_student_balance(&student_id, ledger.balance()).await?;
        Ok(stored)
    }

    /// Changes an entry and restamps every later balance
    pub async fn edit_entry(&self, entry_id: &str, changes: EditLedgerEntry) -> Result<LedgerEntry> {
        let student_id = self
            .ledgers
            .find_by_entry(entry_id)
            .await?
            .map(|ledger| ledger.id)
            .ok_or_else(|| AppError::not_found(format!("Ledger entry {}", entry_id)))?;

        let _guard = self.locks.acquire(&student_id).await;

        let mut ledger = self.ledgers.load_or_new(&student_id).await?;
        let edited = ledger.edit(entry_id, changes, self.clock.now())?;
        let ledger = self.ledgers.save(ledger).await?;

        tracing::info!(
            student_id = %student_id,
            entry_id = %entry_id,
            balance = %ledger.balance(),
            "Ledger entry edited"
        );

        self.sync_student_balance(&student_id, ledger.balance()).await?;
        Ok(edited)
    }

    /// Adjustment or manual charge entered by staff
    pub async fn manual_entry(&self, request: ManualEntryRequest) -> Result<LedgerEntry> {
        if !matches!(
            request.entry_type,
            LedgerEntryType::Adjustment | LedgerEntryType::ManualCharge
        ) {
            return Err(AppError::validation(format!(
                "Manual entries must be 'Adjustment' or 'Manual Charge', got '{}'",
                request.entry_type
            )));
        }

        let student = self.students.require(&request.student_id).await?;

        self.record(NewLedgerEntry {
            student_id: student.id,
            entry_type: request.entry_type,
            description: request.description,
            debit: request.debit,
            credit: request.credit,
            date: request.date.unwrap_or_else(|| self.clock.today()),
            reference_id: request.reference_id,
        })
        .await
    }

    pub async fn summary(&self, student_id: &str) -> Result<BalanceSummary> {
        let ledger = self.ledgers.load_or_new(student_id).await?;
        Ok(summarize(&ledger.entries))
    }

    /// Entries of one student in chronological order
    pub async fn entries_for(&self, student_id: &str) -> Result<Vec<LedgerEntry>> {
        Ok(self.ledgers.load_or_new(student_id).await?.entries)
    }

    pub async fn student_ledger(&self, student_id: &str, page: PageRequest) -> Result<StudentLedgerView> {
        let student = self.students.require(student_id).await?;
        let ledger = self.ledgers.load_or_new(student_id).await?;
        let summary = summarize(&ledger.entries);

        Ok(StudentLedgerView {
            student_id: student.id,
            student_name: student.name,
            entries: Page::from_items(ledger.entries, page),
            summary,
        })
    }

    /// All entries across students, newest first
    pub async fn list(&self, filter: LedgerFilter, page: PageRequest) -> Result<Page<LedgerEntry>> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(AppError::validation("startDate must not be after endDate"));
            }
        }

        let mut entries: Vec<LedgerEntry> = match &filter.student_id {
            Some(student_id) => self.entries_for(student_id).await?,
            None => self.ledgers.all_entries().await?,
        };

        entries.retain(|e| {
            filter.entry_type.map_or(true, |t| e.entry_type == t)
                && filter.start_date.map_or(true, |d| e.date >= d)
                && filter.end_date.map_or(true, |d| e.date <= d)
        });
        entries.sort_by(|a, b| {
            (b.date, b.created_at, b.sequence).cmp(&(a.date, a.created_at, a.sequence))
        });

        Ok(Page::from_items(entries, page))
    }

    async fn sync_student_balance(&self, student_id: &str, net_balance: Decimal) -> Result<()> {
        let mut attempt = 1;
        loop {
            let mut student = self.students.require(student_id).await?;
            if student.current_balance == net_balance.max(Decimal::ZERO)
                && student.advance_balance == (-net_balance).max(Decimal::ZERO)
            {
                return Ok(());
            }

            student.set_balance(net_balance, self.clock.now());
            match self.students.update(student).await {
                Ok(_) => return Ok(()),
                Err(AppError::Conflict(msg)) if attempt < BALANCE_SYNC_ATTEMPTS => {
                    tracing::debug!(student_id = %student_id, attempt, "Retrying balance sync: {}", msg);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
