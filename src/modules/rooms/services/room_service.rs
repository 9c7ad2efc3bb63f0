use std::sync::Arc;

use crate::core::{AppError, Clock, KeyedLocks, Page, PageRequest, Result};
use crate::modules::rooms::models::{
    CreateRoomRequest, Room, RoomStatus, RoomType, RoomView, UpdateRoomRequest,
};
use crate::modules::rooms::repositories::RoomRepository;

#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    pub room_type: Option<RoomType>,
}

pub struct RoomService {
    rooms: RoomRepository,
    locks: KeyedLocks,
    clock: Arc<dyn Clock>,
}

impl RoomService {
    pub fn new(rooms: RoomRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms,
            locks: KeyedLocks::new(),
            clock,
        }
    }

    pub async fn create(&self, request: CreateRoomRequest) -> Result<RoomView> {
        let room = Room::new(request, self.clock.now())?;

        let _guard = self.locks.acquire("room-numbers").await;
        if self.rooms.find_by_number(&room.room_number).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Room number {} already exists",
                room.room_number
            )));
        }

        let room = self.rooms.create(room).await?;
        tracing::info!(room_id = %room.id, room_number = %room.room_number, "Room created");
        Ok(room.into())
    }

    pub async fn get(&self, id: &str) -> Result<RoomView> {
        Ok(self.rooms.require(id).await?.into())
    }

    pub async fn list(&self, filter: RoomFilter, page: PageRequest) -> Result<Page<RoomView>> {
        let mut rooms: Vec<Room> = self
            .rooms
            .list()
            .await?
            .into_iter()
            .filter(|r| {
                filter.status.map_or(true, |s| r.status() == s)
                    && filter.room_type.map_or(true, |t| r.room_type == t)
            })
            .collect();
        rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));

        Ok(Page::from_items(rooms, page).map(RoomView::from))
    }

    pub async fn update(&self, id: &str, request: UpdateRoomRequest) -> Result<RoomView> {
        let _guard = self.locks.acquire(id).await;
        let mut room = self.rooms.require(id).await?;
        room.apply_update(request, self.clock.now())?;
        Ok(self.rooms.update(room).await?.into())
    }

    /// Gives `student_id` a bed in the room
    pub async fn assign(&self, room_id: &str, student_id: &str) -> Result<Room> {
        let _guard = self.locks.acquire(room_id).await;
        let mut room = self.rooms.require(room_id).await?;
        room.assign(student_id, self.clock.now())?;
        let room = self.rooms.update(room).await?;

        tracing::info!(room_id = %room.id, student_id = %student_id, "Student assigned to room");
        Ok(room)
    }

    /// Frees the student's bed; a student not in the room is ignored
    pub async fn vacate(&self, room_id: &str, student_id: &str) -> Result<Room> {
        let _guard = self.locks.acquire(room_id).await;
        let mut room = self.rooms.require(room_id).await?;
        if !room.vacate(student_id, self.clock.now()) {
            tracing::warn!(room_id = %room_id, student_id = %student_id, "Student was not an occupant");
            return Ok(room);
        }

        let room = self.rooms.update(room).await?;
        tracing::info!(room_id = %room.id, student_id = %student_id, "Room vacated");
        Ok(room)
    }

    pub async fn all(&self) -> Result<Vec<Room>> {
        self.rooms.list().await
    }
}
