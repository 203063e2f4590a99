//! Message post and history DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PageMeta;
use crate::domain::Message;

/// Request body for `POST /rooms/:id/messages`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// Author identifier.
    pub user_id: String,
    /// Message text; must not be blank.
    pub content: String,
}

/// A stored chat message. Same shape as an outbound WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Message identifier.
    pub id: String,
    /// Room the message belongs to.
    pub room_id: String,
    /// Author identifier.
    pub user_id: String,
    /// Author display name at send time.
    pub username: String,
    /// Message text.
    pub content: String,
    /// Server timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            room_id: message.room_id.to_string(),
            user_id: message.user_id.to_string(),
            username: message.username,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Response body for `GET /rooms/:id/messages`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageListResponse {
    /// Messages oldest first.
    pub data: Vec<MessageResponse>,
    /// Paging actually applied.
    pub page: PageMeta,
}
