pub mod room_controller;

pub use room_controller::configure;
