mod financial_report;

pub use financial_report::{CreateReportRequest, FinancialSummary, Report, ReportKind};
