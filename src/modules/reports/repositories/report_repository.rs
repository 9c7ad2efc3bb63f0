use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::reports::models::Report;

#[derive(Clone)]
pub struct ReportRepository {
    store: Arc<dyn Repository<Report>>,
}

impl ReportRepository {
    pub fn new(store: Arc<dyn Repository<Report>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, report: Report) -> Result<Report> {
        self.store.create(report).await
    }

    pub async fn require(&self, id: &str) -> Result<Report> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Report {}", id)))
    }

    pub async fn list(&self) -> Result<Vec<Report>> {
        self.store.list().await
    }
}
