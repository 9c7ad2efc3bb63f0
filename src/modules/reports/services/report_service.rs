use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{AppError, Clock, Page, PageRequest, Result};
use crate::modules::billing::models::BillingMonth;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::ledgers::repositories::LedgerRepository;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::reports::models::{CreateReportRequest, FinancialSummary, Report, ReportKind};
use crate::modules::reports::repositories::ReportRepository;
use crate::modules::reports::services::summary::{summarize_period, MAX_REPORT_DAYS};

/// Financial and monthly summaries, computed on demand or stored as snapshots
pub struct ReportService {
    reports: ReportRepository,
    ledgers: LedgerRepository,
    payments: PaymentRepository,
    invoices: InvoiceRepository,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        reports: ReportRepository,
        ledgers: LedgerRepository,
        payments: PaymentRepository,
        invoices: InvoiceRepository,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reports,
            ledgers,
            payments,
            invoices,
            clock,
        }
    }

    /// Summary over `start..=end`
    ///
    /// # Errors
    /// Validation if `start` is after `end` or the range spans more than a leap year.
    pub async fn financial(&self, start: NaiveDate, end: NaiveDate) -> Result<FinancialSummary> {
        validate_range(start, end)?;

        let ledgers = self.ledgers.list().await?;
        let payments = self.payments.list().await?;
        let invoices = self.invoices.list().await?;

        let summary = summarize_period(start, end, &ledgers, &payments, &invoices);
        tracing::info!(
            start = %start,
            end = %end,
            invoiced = %summary.total_invoiced,
            collected = %summary.total_collected,
            "Financial summary generated"
        );
        Ok(summary)
    }

    pub async fn monthly(&self, month: BillingMonth) -> Result<FinancialSummary> {
        self.financial(month.first_day(), month.last_day()).await
    }

    /// Generates a summary and stores it
    pub async fn save(&self, request: CreateReportRequest) -> Result<Report> {
        let (month, start, end) = match request.kind {
            ReportKind::Monthly => {
                let month = request
                    .month
                    .ok_or_else(|| AppError::validation("month is required for a monthly report"))?;
                (Some(month), month.first_day(), month.last_day())
            }
            ReportKind::Financial => match (request.start_date, request.end_date) {
                (Some(start), Some(end)) => (None, start, end),
                _ => {
                    return Err(AppError::validation(
                        "startDate and endDate are required for a financial report",
                    ))
                }
            },
        };

        let summary = self.financial(start, end).await?;
        let report = self
            .reports
            .create(Report {
                id: uuid::Uuid::new_v4().to_string(),
                kind: request.kind,
                month,
                period_start: start,
                period_end: end,
                generated_at: self.clock.now(),
                summary,
                version: 0,
            })
            .await?;

        tracing::info!(report_id = %report.id, kind = ?report.kind, "Report saved");
        Ok(report)
    }

    pub async fn get(&self, id: &str) -> Result<Report> {
        self.reports.require(id).await
    }

    /// Newest first
    pub async fn list(&self, kind: Option<ReportKind>, page: PageRequest) -> Result<Page<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .list()
            .await?
            .into_iter()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .collect();
        reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

        Ok(Page::from_items(reports, page))
    }
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(AppError::validation(format!(
            "startDate ({}) must not be after endDate ({})",
            start, end
        )));
    }

    let days = (end - start).num_days() + 1;
    if days > MAX_REPORT_DAYS {
        return Err(AppError::validation(format!(
            "Date range too large: {} days (maximum {} days)",
            days, MAX_REPORT_DAYS
        )));
    }

    Ok(())
}
