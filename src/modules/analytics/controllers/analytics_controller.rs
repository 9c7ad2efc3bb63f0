use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::response::ok;
use crate::core::AppError;
use crate::modules::analytics::services::AnalyticsService;

fn default_trend_months() -> u32 {
    6
}

#[derive(Debug, Deserialize)]
pub struct CollectionTrendQuery {
    #[serde(default = "default_trend_months")]
    pub months: u32,
}

/// GET /analytics/dashboard
pub async fn dashboard(service: web::Data<Arc<AnalyticsService>>) -> Result<HttpResponse, AppError> {
    Ok(ok(service.dashboard().await?))
}

/// GET /analytics/collection-trend
pub async fn collection_trend(
    service: web::Data<Arc<AnalyticsService>>,
    query: web::Query<CollectionTrendQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.collection_trend(query.months).await?))
}

/// Configure analytics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/analytics")
            .route("/dashboard", web::get().to(dashboard))
            .route("/collection-trend", web::get().to(collection_trend)),
    );
}
