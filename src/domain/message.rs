//! Chat message: the unit stored in history and broadcast to rooms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MessageId, RoomId, User, UserId};

/// A message posted to a room.
///
/// Serialized with snake_case keys; this JSON object is also the payload of
/// every outbound WebSocket frame:
///
/// ```json
/// {
///   "id": "…",
///   "room_id": "…",
///   "user_id": "…",
///   "username": "alice",
///   "content": "hello",
///   "created_at": "2026-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Room the message was posted to.
    pub room_id: RoomId,
    /// Author identifier.
    pub user_id: UserId,
    /// Author display name at posting time.
    pub username: String,
    /// Message text.
    pub content: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message authored by `author` in `room_id`, stamped now.
    #[must_use]
    pub fn new(room_id: RoomId, author: &User, content: String) -> Self {
        Self {
            id: MessageId::new(),
            room_id,
            user_id: author.id.clone(),
            username: author.username.clone(),
            content,
            created_at: Utc::now(),
        }
    }
}
