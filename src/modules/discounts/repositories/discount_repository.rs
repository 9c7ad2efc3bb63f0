use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::discounts::models::Discount;

#[derive(Clone)]
pub struct DiscountRepository {
    store: Arc<dyn Repository<Discount>>,
}

impl DiscountRepository {
    pub fn new(store: Arc<dyn Repository<Discount>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, discount: Discount) -> Result<Discount> {
        self.store.create(discount).await
    }

    pub async fn require(&self, id: &str) -> Result<Discount> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Discount {}", id)))
    }

    pub async fn update(&self, discount: Discount) -> Result<Discount> {
        self.store.update(discount).await
    }

    pub async fn list(&self) -> Result<Vec<Discount>> {
        self.store.list().await
    }

    pub async fn find_active(&self, student_id: &str, reason: &str) -> Result<Option<Discount>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|d| d.student_id == student_id && d.is_active() && d.has_reason(reason)))
    }
}
