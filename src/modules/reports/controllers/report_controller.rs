use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok};
use crate::core::{AppError, PageRequest};
use crate::modules::billing::models::BillingMonth;
use crate::modules::reports::models::{CreateReportRequest, ReportKind};
use crate::modules::reports::services::ReportService;

/// Query parameters for the financial report endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReportQuery {
    /// Inclusive, `YYYY-MM-DD`
    pub start_date: NaiveDate,
    /// Inclusive, `YYYY-MM-DD`
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub kind: Option<ReportKind>,
}

/// GET /reports/financial
pub async fn get_financial_report(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<FinancialReportQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.financial(query.start_date, query.end_date).await?))
}

/// GET /reports/monthly/{month}
pub async fn get_monthly_report(
    service: web::Data<Arc<ReportService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let month: BillingMonth = path.into_inner().parse()?;
    Ok(ok(service.monthly(month).await?))
}

/// POST /reports
pub async fn save_report(
    service: web::Data<Arc<ReportService>>,
    request: web::Json<CreateReportRequest>,
) -> Result<HttpResponse, AppError> {
    let report = service.save(request.into_inner()).await?;
    Ok(created(report, "Report generated"))
}

/// GET /reports
pub async fn list_reports(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ListReportsQuery>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit)?;
    Ok(ok(service.list(query.kind, page).await?))
}

/// GET /reports/{id}
pub async fn get_report(
    service: web::Data<Arc<ReportService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("", web::post().to(save_report))
            .route("", web::get().to(list_reports))
            .route("/financial", web::get().to(get_financial_report))
            .route("/monthly/{month}", web::get().to(get_monthly_report))
            .route("/{id}", web::get().to(get_report)),
    );
}
