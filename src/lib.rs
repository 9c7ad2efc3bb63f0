//! Hostel back office
//!
//! Billing and bookkeeping for a student hostel: admissions, room assignment,
//! prorated invoicing, payments, discounts and a per-student running-balance ledger.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod storage;

pub use app::AppServices;
pub use modules::{billing, invoices, ledgers, payments, students};
