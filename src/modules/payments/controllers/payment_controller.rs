use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok};
use crate::core::{AppError, PageRequest};
use crate::modules::payments::models::{CreatePaymentRequest, PaymentMethod};
use crate::modules::payments::services::{PaymentFilter, PaymentService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub student_id: Option<String>,
    pub method: Option<PaymentMethod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatsQuery {
    pub student_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// POST /payments
pub async fn record_payment(
    service: web::Data<Arc<PaymentService>>,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service.record(request.into_inner()).await?;
    Ok(created(payment, "Payment recorded"))
}

/// GET /payments
pub async fn list_payments(
    service: web::Data<Arc<PaymentService>>,
    query: web::Query<ListPaymentsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = PaymentFilter {
        student_id: query.student_id,
        method: query.method,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    Ok(ok(service.list(filter, page).await?))
}

/// GET /payments/stats
pub async fn payment_stats(
    service: web::Data<Arc<PaymentService>>,
    query: web::Query<PaymentStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let filter = PaymentFilter {
        student_id: query.student_id,
        start_date: query.start_date,
        end_date: query.end_date,
        ..Default::default()
    };
    Ok(ok(service.stats(filter).await?))
}

/// GET /payments/{id}
pub async fn get_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(record_payment))
            .route("", web::get().to(list_payments))
            .route("/stats", web::get().to(payment_stats))
            .route("/{id}", web::get().to(get_payment)),
    );
}
