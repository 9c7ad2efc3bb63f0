// Reports module: period summaries and stored snapshots

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{FinancialSummary, Report, ReportKind};
pub use repositories::ReportRepository;
pub use services::ReportService;
