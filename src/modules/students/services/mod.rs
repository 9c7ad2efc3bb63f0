pub mod student_service;

pub use student_service::{CheckoutOutcome, FeeConfigurationOutcome, StudentFilter, StudentService};
