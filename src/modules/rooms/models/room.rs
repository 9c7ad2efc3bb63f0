use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::validate_fee;
use crate::core::{AppError, FieldErrors, Record, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Dormitory,
}

/// Derived from occupancy and the maintenance flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub floor: i32,
    pub room_type: RoomType,
    pub capacity: u32,
    /// Default monthly accommodation fee offered to occupants
    pub monthly_rate: Decimal,
    #[serde(default)]
    pub occupant_ids: Vec<String>,
    #[serde(default)]
    pub under_maintenance: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Record for Room {
    const COLLECTION: &'static str = "rooms";

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

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_number: String,
    #[serde(default)]
    pub floor: i32,
    pub room_type: RoomType,
    pub capacity: u32,
    #[serde(default)]
    pub monthly_rate: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    pub floor: Option<i32>,
    pub room_type: Option<RoomType>,
    pub capacity: Option<u32>,
    pub monthly_rate: Option<Decimal>,
    pub under_maintenance: Option<bool>,
}

/// Room with its derived occupancy fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub status: RoomStatus,
    pub occupancy: u32,
    pub available_beds: u32,
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        Self {
            status: room.status(),
            occupancy: room.occupancy(),
            available_beds: room.available_beds(),
            room,
        }
    }
}

impl Room {
    pub fn new(request: CreateRoomRequest, now: DateTime<Utc>) -> Result<Self> {
        let mut errors = FieldErrors::new();
        errors.check(
            !request.room_number.trim().is_empty(),
            "roomNumber",
            "Room number is required",
        );
        errors.check(request.capacity >= 1, "capacity", "Capacity must be at least 1");
        if let Err(e) = validate_fee("monthlyRate", request.monthly_rate) {
            errors.add("monthlyRate", e.message());
        }
        errors.into_result()?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            room_number: request.room_number.trim().to_string(),
            floor: request.floor,
            room_type: request.room_type,
            capacity: request.capacity,
            monthly_rate: request.monthly_rate,
            occupant_ids: Vec::new(),
            under_maintenance: false,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn occupancy(&self) -> u32 {
        self.occupant_ids.len() as u32
    }

    pub fn available_beds(&self) -> u32 {
        self.capacity.saturating_sub(self.occupancy())
    }

    pub fn status(&self) -> RoomStatus {
        if self.under_maintenance {
            RoomStatus::Maintenance
        } else if self.available_beds() == 0 {
            RoomStatus::Occupied
        } else {
            RoomStatus::Available
        }
    }

    pub fn apply_update(&mut self, request: UpdateRoomRequest, now: DateTime<Utc>) -> Result<()> {
        if let Some(capacity) = request.capacity {
            if capacity < 1 {
                return Err(AppError::validation("Capacity must be at least 1"));
            }
            if capacity < self.occupancy() {
                return Err(AppError::validation(format!(
                    "Capacity {} is below the current {} occupant(s) of room {}",
                    capacity,
                    self.occupancy(),
                    self.room_number
                )));
            }
            self.capacity = capacity;
        }
        if let Some(rate) = request.monthly_rate {
            validate_fee("monthlyRate", rate)?;
            self.monthly_rate = rate;
        }
        if let Some(floor) = request.floor {
            self.floor = floor;
        }
        if let Some(room_type) = request.room_type {
            self.room_type = room_type;
        }
        if let Some(flag) = request.under_maintenance {
            self.under_maintenance = flag;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Adds an occupant; the room must be in service and have a free bed
    pub fn assign(&mut self, student_id: &str, now: DateTime<Utc>) -> Result<()> {
        if self.under_maintenance {
            return Err(AppError::validation(format!(
                "Room {} is under maintenance",
                self.room_number
            )));
        }
        if self.occupant_ids.iter().any(|id| id == student_id) {
            return Ok(());
        }
        if self.available_beds() == 0 {
            return Err(AppError::validation(format!(
                "Room {} is full",
                self.room_number
            )));
        }

        self.occupant_ids.push(student_id.to_string());
        self.updated_at = now;
        Ok(())
    }

    /// Removes an occupant; returns whether they were present
    pub fn vacate(&mut self, student_id: &str, now: DateTime<Utc>) -> bool {
        let before = self.occupant_ids.len();
        self.occupant_ids.retain(|id| id != student_id);
        let removed = self.occupant_ids.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }
}
