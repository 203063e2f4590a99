//! Room handlers: create, list, get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateRoomRequest, RoomListResponse, RoomResponse};
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ChatError, ErrorResponse};

/// `POST /rooms` — Create a room.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] for a blank name and
/// [`ChatError::RoomNameTaken`] when the name is in use.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "Create a room",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Blank name", body = ErrorResponse),
        (status = 409, description = "Room name taken", body = ErrorResponse),
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let room = state.rooms.create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(RoomResponse::from(room))))
}

/// `GET /rooms` — List rooms.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns every room, oldest first.",
    responses(
        (status = 200, description = "Room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let data = state
        .rooms
        .list()
        .await
        .into_iter()
        .map(RoomResponse::from)
        .collect();
    Json(RoomListResponse { data })
}

/// `GET /rooms/:id` — Fetch a room.
///
/// # Errors
///
/// Returns [`ChatError::RoomNotFound`] if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    summary = "Get a room",
    params(
        ("id" = String, Path, description = "Room id"),
    ),
    responses(
        (status = 200, description = "Room details", body = RoomResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let id = RoomId::parse(&id)?;
    let room = state.rooms.get(&id).await?;
    Ok(Json(RoomResponse::from(room)))
}

/// Room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room))
}
