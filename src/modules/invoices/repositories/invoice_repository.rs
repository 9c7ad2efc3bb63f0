use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::billing::models::BillingMonth;
use crate::modules::invoices::models::Invoice;

#[derive(Clone)]
pub struct InvoiceRepository {
    store: Arc<dyn Repository<Invoice>>,
}

impl InvoiceRepository {
    pub fn new(store: Arc<dyn Repository<Invoice>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, invoice: Invoice) -> Result<Invoice> {
        self.store.create(invoice).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        self.store.find_by_id(id).await
    }

    pub async fn require(&self, id: &str) -> Result<Invoice> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {}", id)))
    }

    pub async fn update(&self, invoice: Invoice) -> Result<Invoice> {
        self.store.update(invoice).await
    }

    pub async fn list(&self) -> Result<Vec<Invoice>> {
        self.store.list().await
    }

    pub async fn list_for_student(&self, student_id: &str) -> Result<Vec<Invoice>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|i| i.student_id == student_id)
            .collect())
    }

    /// The invoice billing `month` for the student, if one was issued
    pub async fn find_for_student_month(
        &self,
        student_id: &str,
        month: BillingMonth,
    ) -> Result<Option<Invoice>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .find(|i| i.student_id == student_id && i.billing_month == month))
    }

    /// Unsettled invoices of a student, oldest due date first
    pub async fn open_for_student(&self, student_id: &str) -> Result<Vec<Invoice>> {
        let mut open: Vec<Invoice> = self
            .list_for_student(student_id)
            .await?
            .into_iter()
            .filter(|i| i.is_open())
            .collect();
        open.sort_by(|a, b| {
            (a.due_date, a.billing_month, a.created_at).cmp(&(b.due_date, b.billing_month, b.created_at))
        });
        Ok(open)
    }
}
