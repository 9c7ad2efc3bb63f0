use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::payments::models::Payment;

#[derive(Clone)]
pub struct PaymentRepository {
    store: Arc<dyn Repository<Payment>>,
}

impl PaymentRepository {
    pub fn new(store: Arc<dyn Repository<Payment>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payment: Payment) -> Result<Payment> {
        self.store.create(payment).await
    }

    pub async fn require(&self, id: &str) -> Result<Payment> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))
    }

    pub async fn list(&self) -> Result<Vec<Payment>> {
        self.store.list().await
    }
}
