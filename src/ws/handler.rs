//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use super::connection::{Session, run_connection};
use crate::app_state::AppState;
use crate::domain::{RoomId, UserId};
use crate::error::ChatError;

/// Query parameters accepted by `GET /ws`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConnectParams {
    /// Room to join.
    pub room_id: Option<String>,
    /// Connecting user.
    pub user_id: Option<String>,
    /// Hide this user's own messages on the connection. Defaults to `false`.
    #[serde(default)]
    pub suppress_echo: bool,
}

impl ConnectParams {
    /// Validates the parameters into a [`Session`].
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidRequest`] if either id is missing or blank.
    pub fn into_session(self) -> Result<Session, ChatError> {
        let (Some(room_id), Some(user_id)) = (self.room_id, self.user_id) else {
            return Err(ChatError::InvalidRequest(
                "room_id and user_id are required".to_string(),
            ));
        };
        Ok(Session {
            room_id: RoomId::parse(&room_id)?,
            user_id: UserId::parse(&user_id)?,
            suppress_echo: self.suppress_echo,
        })
    }
}

/// `GET /ws?room_id=…&user_id=…` — Upgrade to a room connection.
///
/// Ids are taken as given; the room need not exist in the store for the
/// connection to receive broadcasts.
///
/// Echo suppression is off by default: the connection receives every room
/// message, including those its own user sent, and the client filters them
/// if it wants to. Pass `suppress_echo=true` to have the server drop them.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] (400) when `room_id` or `user_id`
/// is missing or blank; no connection is created.
#[utoipa::path(
    get,
    path = "/ws",
    tag = "WebSocket",
    params(ConnectParams),
    responses(
        (status = 101, description = "Switching to the WebSocket protocol"),
        (status = 400, description = "Missing room_id or user_id", body = crate::error::ErrorResponse),
    )
)]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ChatError> {
    let session = params.into_session()?;
    let ctx = state.connection_context();
    tracing::info!(user_id = %session.user_id, room_id = %session.room_id, "websocket upgrade");

    Ok(ws
        .max_message_size(ctx.settings.max_message_bytes)
        .on_upgrade(move |socket| run_connection(socket, session, ctx)))
}
