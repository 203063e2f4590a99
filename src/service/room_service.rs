//! Room creation and lookup.

use std::sync::Arc;

use crate::domain::{Room, RoomId};
use crate::error::ChatError;
use crate::persistence::RoomStore;

/// Use cases around rooms.
#[derive(Debug, Clone)]
pub struct RoomService {
    rooms: Arc<RoomStore>,
}

impl RoomService {
    /// Creates a new `RoomService`.
    #[must_use]
    pub fn new(rooms: Arc<RoomStore>) -> Self {
        Self { rooms }
    }

    /// Creates a room named `name` (surrounding whitespace is trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidRequest`] for an empty name and
    /// [`ChatError::RoomNameTaken`] if the name is in use.
    pub async fn create(&self, name: &str) -> Result<Room, ChatError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::InvalidRequest(
                "room name cannot be empty".to_string(),
            ));
        }

        let room = Room::new(name.to_string());
        self.rooms.insert(room.clone()).await?;
        tracing::info!(room_id = %room.id, name, "room created");
        Ok(room)
    }

    /// Looks up a room by id.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if the room does not exist.
    pub async fn get(&self, id: &RoomId) -> Result<Room, ChatError> {
        self.rooms.get(id).await
    }

    /// Returns all rooms, oldest first.
    pub async fn list(&self) -> Vec<Room> {
        self.rooms.list().await
    }

    /// Returns `true` if the room exists.
    pub async fn exists(&self, id: &RoomId) -> bool {
        self.rooms.exists(id).await
    }
}
