pub mod report_service;
pub mod summary;

pub use report_service::ReportService;
pub use summary::summarize_period;
