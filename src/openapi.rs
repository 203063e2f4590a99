//! OpenAPI document for the REST and WebSocket surface.

use utoipa::OpenApi;

use crate::api::dto::{
    CreateRoomRequest, CreateUserRequest, MessageListResponse, MessageResponse, PageMeta,
    RoomListResponse, RoomResponse, SendMessageRequest, UserResponse,
};
use crate::api::handlers::system::{HealthResponse, StatsResponse};
use crate::api::handlers::{messages, rooms, system, users};
use crate::error::{ErrorBody, ErrorResponse};
use crate::ws::handler;

/// Aggregated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "chat-hub",
        description = "Chat rooms with REST history and live WebSocket delivery."
    ),
    paths(
        users::create_user,
        users::get_user,
        rooms::create_room,
        rooms::list_rooms,
        rooms::get_room,
        messages::send_message,
        messages::list_messages,
        system::health_handler,
        system::stats_handler,
        handler::ws_handler,
    ),
    components(schemas(
        CreateUserRequest,
        UserResponse,
        CreateRoomRequest,
        RoomResponse,
        RoomListResponse,
        SendMessageRequest,
        MessageResponse,
        MessageListResponse,
        PageMeta,
        HealthResponse,
        StatsResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Users", description = "User registration"),
        (name = "Rooms", description = "Room management"),
        (name = "Messages", description = "Posting and history"),
        (name = "System", description = "Health and hub statistics"),
        (name = "WebSocket", description = "Live room connection"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/users",
            "/api/v1/users/{id}",
            "/api/v1/rooms",
            "/api/v1/rooms/{id}",
            "/api/v1/rooms/{id}/messages",
            "/health",
            "/stats",
            "/ws",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
