use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok, ok_with_message};
use crate::core::{AppError, PageRequest};
use crate::modules::billing::models::BillingMonth;
use crate::modules::billing::services::MonthlyBillingService;
use crate::modules::invoices::models::{InvoiceKind, InvoiceStatus};
use crate::modules::invoices::services::{InvoiceFilter, InvoiceService};

/// Query parameters for listing invoices
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub student_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub month: Option<BillingMonth>,
    pub kind: Option<InvoiceKind>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub student_id: Option<String>,
    pub month: Option<BillingMonth>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBillingRequest {
    pub month: BillingMonth,
    pub student_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    pub student_id: String,
    pub month: BillingMonth,
}

/// GET /invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    query: web::Query<ListInvoicesQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = InvoiceFilter {
        student_id: query.student_id,
        status: query.status,
        month: query.month,
        kind: query.kind,
    };

    Ok(ok(service.list(filter, page).await?))
}

/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// GET /invoices/stats
pub async fn invoice_stats(
    service: web::Data<Arc<InvoiceService>>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = InvoiceFilter {
        student_id: query.student_id,
        month: query.month,
        ..Default::default()
    };
    Ok(ok(service.stats(filter).await?))
}

/// POST /invoices/generate
pub async fn generate_invoice(
    service: web::Data<Arc<InvoiceService>>,
    request: web::Json<GenerateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let invoice = service
        .generate_for_student(&request.student_id, request.month)
        .await?;
    Ok(created(invoice, "Invoice generated"))
}

/// POST /invoices/monthly-billing
pub async fn run_monthly_billing(
    service: web::Data<Arc<MonthlyBillingService>>,
    request: web::Json<MonthlyBillingRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let outcome = service.run(request.month, request.student_ids).await?;
    let message = format!(
        "Monthly billing for {}: {} generated, {} skipped, {} failed",
        outcome.month, outcome.success_count, outcome.skipped_count, outcome.failed_count
    );
    Ok(ok_with_message(outcome, message))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(list_invoices))
            .route("/stats", web::get().to(invoice_stats))
            .route("/generate", web::post().to(generate_invoice))
            .route("/monthly-billing", web::post().to(run_monthly_billing))
            .route("/{id}", web::get().to(get_invoice)),
    );
}
