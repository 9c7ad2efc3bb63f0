// Students module: enrollment, fees, checkout and balances

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{FeeConfiguration, Student, StudentStatus};
pub use repositories::StudentRepository;
pub use services::StudentService;
