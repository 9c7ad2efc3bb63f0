use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok, ok_with_message};
use crate::core::{AppError, PageRequest};
use crate::modules::booking_requests::models::{
    ApproveBookingRequest, BookingStatus, CreateBookingRequest, RejectBookingRequest,
};
use crate::modules::booking_requests::services::BookingService;

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<BookingStatus>,
}

/// POST /booking-requests
pub async fn create_booking(
    service: web::Data<Arc<BookingService>>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let booking = service.create(request.into_inner()).await?;
    Ok(created(booking, "Booking request submitted"))
}

/// GET /booking-requests
pub async fn list_bookings(
    service: web::Data<Arc<BookingService>>,
    query: web::Query<ListBookingsQuery>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit)?;
    Ok(ok(service.list(query.status, page).await?))
}

/// GET /booking-requests/{id}
pub async fn get_booking(
    service: web::Data<Arc<BookingService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// POST /booking-requests/{id}/approve
pub async fn approve_booking(
    service: web::Data<Arc<BookingService>>,
    path: web::Path<String>,
    request: web::Json<ApproveBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = service
        .approve(&path.into_inner(), request.into_inner())
        .await?;
    Ok(ok_with_message(outcome, "Booking request approved"))
}

/// POST /booking-requests/{id}/reject
pub async fn reject_booking(
    service: web::Data<Arc<BookingService>>,
    path: web::Path<String>,
    request: web::Json<RejectBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let booking = service
        .reject(&path.into_inner(), request.into_inner())
        .await?;
    Ok(ok_with_message(booking, "Booking request rejected"))
}

/// Configure booking request routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/booking-requests")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/approve", web::post().to(approve_booking))
            .route("/{id}/reject", web::post().to(reject_booking)),
    );
}
