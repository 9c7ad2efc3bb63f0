mod booking_request;

pub use booking_request::{
    ApproveBookingRequest, BookingRequest, BookingStatus, CreateBookingRequest,
    RejectBookingRequest,
};
