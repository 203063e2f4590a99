//! Room DTOs for create, get and list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Room;

/// Request body for `POST /rooms`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    /// Room name; surrounding whitespace is trimmed.
    pub name: String,
}

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    /// Room identifier.
    pub id: String,
    /// Unique room name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name,
            created_at: room.created_at,
        }
    }
}

/// Response body for `GET /rooms`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomListResponse {
    /// Rooms ordered by creation time.
    pub data: Vec<RoomResponse>,
}
