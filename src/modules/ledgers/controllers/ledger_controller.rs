use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok, ok_with_message};
use crate::core::{AppError, PageRequest};
use crate::modules::ledgers::models::{EditLedgerEntry, LedgerEntryType};
use crate::modules::ledgers::services::{LedgerFilter, LedgerService, ManualEntryRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLedgerQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub student_id: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<LedgerEntryType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// GET /ledgers
pub async fn list_entries(
    service: web::Data<Arc<LedgerService>>,
    query: web::Query<ListLedgerQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = LedgerFilter {
        student_id: query.student_id,
        entry_type: query.entry_type,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    Ok(ok(service.list(filter, page).await?))
}

/// GET /ledgers/students/{student_id}
pub async fn student_ledger(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit)?;
    Ok(ok(service.student_ledger(&path.into_inner(), page).await?))
}

/// POST /ledgers/manual
pub async fn manual_entry(
    service: web::Data<Arc<LedgerService>>,
    request: web::Json<ManualEntryRequest>,
) -> Result<HttpResponse, AppError> {
    let entry = service.manual_entry(request.into_inner()).await?;
    Ok(created(entry, "Ledger entry recorded"))
}

/// PUT /ledgers/entries/{entry_id}
pub async fn edit_entry(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
    request: web::Json<EditLedgerEntry>,
) -> Result<HttpResponse, AppError> {
    let entry = service
        .edit_entry(&path.into_inner(), request.into_inner())
        .await?;
    Ok(ok_with_message(entry, "Ledger entry updated; later balances recalculated"))
}

/// Configure ledger routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ledgers")
            .route("", web::get().to(list_entries))
            .route("/manual", web::post().to(manual_entry))
            .route("/students/{student_id}", web::get().to(student_ledger))
            .route("/entries/{entry_id}", web::put().to(edit_entry)),
    );
}
