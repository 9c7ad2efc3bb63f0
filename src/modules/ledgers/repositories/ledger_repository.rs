use std::sync::Arc;

use crate::core::{Repository, Result};
use crate::modules::ledgers::models::{LedgerEntry, StudentLedger};

/// Student ledgers, one aggregate per student
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<dyn Repository<StudentLedger>>,
}

impl LedgerRepository {
    pub fn new(store: Arc<dyn Repository<StudentLedger>>) -> Self {
        Self { store }
    }

    pub async fn find_for_student(&self, student_id: &str) -> Result<Option<StudentLedger>> {
        self.store.find_by_id(student_id).await
    }

    /// The student's ledger, or a fresh empty one when nothing was recorded yet
    pub async fn load_or_new(&self, student_id: &str) -> Result<StudentLedger> {
        Ok(self
            .store
            .find_by_id(student_id)
            .await?
            .unwrap_or_else(|| StudentLedger::new(student_id)))
    }

    /// Inserts a never-stored ledger or compare-and-swaps an existing one
    pub async fn save(&self, ledger: StudentLedger) -> Result<StudentLedger> {
        if ledger.version == 0 {
            self.store.create(ledger).await
        } else {
            self.store.update(ledger).await
        }
    }

    pub async fn list(&self) -> Result<Vec<StudentLedger>> {
        self.store.list().await
    }

    /// The ledger holding the given entry
    pub async fn find_by_entry(&self, entry_id: &str) -> Result<Option<StudentLedger>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .find(|ledger| ledger.contains(entry_id)))
    }

    /// Every entry of every student
    pub async fn all_entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .flat_map(|ledger| ledger.entries)
            .collect())
    }
}
