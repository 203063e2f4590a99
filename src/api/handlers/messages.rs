//! Message handlers: post to a room and read its history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    HistoryParams, MessageListResponse, MessageResponse, PageMeta, SendMessageRequest,
};
use crate::app_state::AppState;
use crate::domain::{RoomId, UserId};
use crate::error::{ChatError, ErrorResponse};

/// `POST /rooms/:id/messages` — Post a message.
///
/// The message is stored and then broadcast to every live connection in
/// the room, the author's included.
///
/// # Errors
///
/// Returns [`ChatError::EmptyContent`], [`ChatError::UserNotFound`] or
/// [`ChatError::RoomNotFound`].
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/messages",
    tag = "Messages",
    summary = "Post a message",
    params(
        ("id" = String, Path, description = "Room id"),
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message stored and broadcast", body = MessageResponse),
        (status = 400, description = "Blank content", body = ErrorResponse),
        (status = 404, description = "User or room not found", body = ErrorResponse),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let room_id = RoomId::parse(&room_id)?;
    let user_id = UserId::parse(&req.user_id)?;
    let message = state
        .messages
        .send(&room_id, &user_id, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// `GET /rooms/:id/messages` — Page through history, oldest first.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] for a blank room id.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/messages",
    tag = "Messages",
    summary = "Read room history",
    description = "Unknown rooms yield an empty page.",
    params(
        ("id" = String, Path, description = "Room id"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "History page", body = MessageListResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ChatError> {
    let room_id = RoomId::parse(&room_id)?;
    let (limit, offset) = state
        .messages
        .history_policy()
        .resolve(params.limit, params.offset);
    let data: Vec<MessageResponse> = state
        .messages
        .history(&room_id, params.limit, params.offset)
        .await
        .into_iter()
        .map(MessageResponse::from)
        .collect();

    let page = PageMeta {
        limit,
        offset,
        count: data.len(),
    };
    Ok(Json(MessageListResponse { data, page }))
}

/// Message routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rooms/{id}/messages", get(list_messages).post(send_message))
}
