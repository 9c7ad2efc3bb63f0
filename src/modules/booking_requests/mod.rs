// Booking requests module: admission applications and their approval

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BookingRequest, BookingStatus};
pub use repositories::BookingRepository;
pub use services::BookingService;
