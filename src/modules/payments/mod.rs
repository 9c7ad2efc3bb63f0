// Payments module: recording payments and settling invoices

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Payment, PaymentAllocation, PaymentMethod};
pub use repositories::PaymentRepository;
pub use services::PaymentService;
