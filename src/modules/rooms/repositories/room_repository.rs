use std::sync::Arc;

use crate::core::{AppError, Repository, Result};
use crate::modules::rooms::models::Room;

#[derive(Clone)]
pub struct RoomRepository {
    store: Arc<dyn Repository<Room>>,
}

impl RoomRepository {
    pub fn new(store: Arc<dyn Repository<Room>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, room: Room) -> Result<Room> {
        self.store.create(room).await
    }

    pub async fn require(&self, id: &str) -> Result<Room> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Room {}", id)))
    }

    pub async fn update(&self, room: Room) -> Result<Room> {
        self.store.update(room).await
    }

    pub async fn list(&self) -> Result<Vec<Room>> {
        self.store.list().await
    }

    /// Room numbers are compared case-insensitively
    pub async fn find_by_number(&self, room_number: &str) -> Result<Option<Room>> {
        let wanted = room_number.trim().to_lowercase();
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .find(|r| r.room_number.to_lowercase() == wanted))
    }
}
