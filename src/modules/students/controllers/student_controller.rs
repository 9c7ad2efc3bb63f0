use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{ok, ok_with_message};
use crate::core::{AppError, PageRequest};
use crate::modules::students::models::{
    CheckoutRequest, FeeConfiguration, StudentStatus, UpdateStudentRequest,
};
use crate::modules::students::services::{StudentFilter, StudentService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<StudentStatus>,
    pub room_id: Option<String>,
    pub search: Option<String>,
}

/// GET /students
pub async fn list_students(
    service: web::Data<Arc<StudentService>>,
    query: web::Query<ListStudentsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = StudentFilter {
        status: query.status,
        room_id: query.room_id,
        search: query.search,
    };
    Ok(ok(service.list(filter, page).await?))
}

/// GET /students/{id}
pub async fn get_student(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// PUT /students/{id}
pub async fn update_student(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
    request: web::Json<UpdateStudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student = service
        .update(&path.into_inner(), request.into_inner())
        .await?;
    Ok(ok_with_message(student, "Student updated"))
}

/// PUT /students/{id}/fees
pub async fn configure_fees(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
    request: web::Json<FeeConfiguration>,
) -> Result<HttpResponse, AppError> {
    let outcome = service
        .configure_fees(&path.into_inner(), request.into_inner())
        .await?;
    let message = if outcome.invoice.is_some() {
        "Fee configuration saved and initial invoice generated"
    } else {
        "Fee configuration saved; new fees apply from the next billing cycle"
    };
    Ok(ok_with_message(outcome, message))
}

/// POST /students/{id}/checkout
pub async fn checkout_student(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = service
        .checkout(&path.into_inner(), request.checkout_date)
        .await?;
    Ok(ok_with_message(outcome, "Student checked out"))
}

/// GET /students/{id}/balance
pub async fn student_balance(
    service: web::Data<Arc<StudentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.balance(&path.into_inner()).await?))
}

/// Configure student routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("", web::get().to(list_students))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}/fees", web::put().to(configure_fees))
            .route("/{id}/checkout", web::post().to(checkout_student))
            .route("/{id}/balance", web::get().to(student_balance)),
    );
}
