// Discounts module: fee concessions credited to the ledger

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Discount, DiscountStatus};
pub use repositories::DiscountRepository;
pub use services::DiscountService;
