use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok, ok_with_message};
use crate::core::{AppError, PageRequest};
use crate::modules::discounts::models::{ApplyDiscountRequest, BulkDiscountRequest, DiscountStatus};
use crate::modules::discounts::services::{DiscountFilter, DiscountService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDiscountsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub student_id: Option<String>,
    pub status: Option<DiscountStatus>,
}

/// POST /discounts
pub async fn apply_discount(
    service: web::Data<Arc<DiscountService>>,
    request: web::Json<ApplyDiscountRequest>,
) -> Result<HttpResponse, AppError> {
    let discount = service.apply(request.into_inner()).await?;
    Ok(created(discount, "Discount applied"))
}

/// POST /discounts/bulk
pub async fn bulk_apply_discount(
    service: web::Data<Arc<DiscountService>>,
    request: web::Json<BulkDiscountRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = service.bulk_apply(request.into_inner()).await?;
    let message = format!(
        "Bulk discount: {} applied, {} failed",
        outcome.success_count, outcome.failed_count
    );
    Ok(ok_with_message(outcome, message))
}

/// GET /discounts
pub async fn list_discounts(
    service: web::Data<Arc<DiscountService>>,
    query: web::Query<ListDiscountsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = DiscountFilter {
        student_id: query.student_id,
        status: query.status,
    };
    Ok(ok(service.list(filter, page).await?))
}

/// GET /discounts/{id}
pub async fn get_discount(
    service: web::Data<Arc<DiscountService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// POST /discounts/{id}/expire
pub async fn expire_discount(
    service: web::Data<Arc<DiscountService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let discount = service.expire(&path.into_inner()).await?;
    Ok(ok_with_message(discount, "Discount expired"))
}

/// Configure discount routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/discounts")
            .route("", web::post().to(apply_discount))
            .route("", web::get().to(list_discounts))
            .route("/bulk", web::post().to(bulk_apply_discount))
            .route("/{id}", web::get().to(get_discount))
            .route("/{id}/expire", web::post().to(expire_discount)),
    );
}
