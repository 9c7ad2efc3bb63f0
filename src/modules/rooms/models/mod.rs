mod room;

pub use room::{CreateRoomRequest, Room, RoomStatus, RoomType, RoomView, UpdateRoomRequest};
