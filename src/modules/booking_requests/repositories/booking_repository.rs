use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::booking_requests::models::BookingRequest;

#[derive(Clone)]
pub struct BookingRepository {
    store: Arc<dyn Repository<BookingRequest>>,
}

impl BookingRepository {
    pub fn new(store: Arc<dyn Repository<BookingRequest>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, booking: BookingRequest) -> Result<BookingRequest> {
        self.store.create(booking).await
    }

    pub async fn require(&self, id: &str) -> Result<BookingRequest> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking request {}", id)))
    }

    pub async fn update(&self, booking: BookingRequest) -> Result<BookingRequest> {
        self.store.update(booking).await
    }

    pub async fn list(&self) -> Result<Vec<BookingRequest>> {
        self.store.list().await
    }
}
