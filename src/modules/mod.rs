pub mod analytics;
pub mod billing;
pub mod booking_requests;
pub mod discounts;
pub mod health;
pub mod invoices;
pub mod ledgers;
pub mod payments;
pub mod reports;
pub mod rooms;
pub mod students;
