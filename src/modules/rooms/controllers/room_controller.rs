use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::pagination::{default_limit, default_page};
use crate::core::response::{created, ok, ok_with_message};
use crate::core::{AppError, PageRequest};
use crate::modules::rooms::models::{CreateRoomRequest, RoomStatus, RoomType, UpdateRoomRequest};
use crate::modules::rooms::services::{RoomFilter, RoomService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<RoomStatus>,
    pub room_type: Option<RoomType>,
}

/// POST /rooms
pub async fn create_room(
    service: web::Data<Arc<RoomService>>,
    request: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let room = service.create(request.into_inner()).await?;
    Ok(created(room, "Room created"))
}

/// GET /rooms
pub async fn list_rooms(
    service: web::Data<Arc<RoomService>>,
    query: web::Query<ListRoomsQuery>,
) -> Result<HttpResponse, AppError> {
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = RoomFilter {
        status: query.status,
        room_type: query.room_type,
    };
    Ok(ok(service.list(filter, page).await?))
}

/// GET /rooms/{id}
pub async fn get_room(
    service: web::Data<Arc<RoomService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(ok(service.get(&path.into_inner()).await?))
}

/// PUT /rooms/{id}
pub async fn update_room(
    service: web::Data<Arc<RoomService>>,
    path: web::Path<String>,
    request: web::Json<UpdateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let room = service
        .update(&path.into_inner(), request.into_inner())
        .await?;
    Ok(ok_with_message(room, "Room updated"))
}

/// Configure room routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .route("", web::post().to(create_room))
            .route("", web::get().to(list_rooms))
            .route("/{id}", web::get().to(get_room))
            .route("/{id}", web::put().to(update_room)),
    );
}
