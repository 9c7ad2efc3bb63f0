// Rooms module: inventory and bed assignment

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Room, RoomStatus, RoomType};
pub use repositories::RoomRepository;
pub use services::RoomService;
