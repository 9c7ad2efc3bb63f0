pub mod booking_service;

pub use booking_service::{ApprovalOutcome, BookingService};
