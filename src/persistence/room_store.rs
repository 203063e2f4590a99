//! In-memory room storage with unique room names.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::domain::{Room, RoomId};
use crate::error::ChatError;

#[derive(Debug, Default)]
struct RoomTable {
    by_id: HashMap<RoomId, Room>,
    names: HashSet<String>,
}

/// Keyed map of rooms.
///
/// Room names are unique: the name check and the insert share one write
/// lock, so two concurrent creates of the same name cannot both succeed.
#[derive(Debug, Default)]
pub struct RoomStore {
    table: RwLock<RoomTable>,
}

impl RoomStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new room.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNameTaken`] if a room with the same name
    /// already exists.
    pub async fn insert(&self, room: Room) -> Result<(), ChatError> {
        let mut table = self.table.write().await;
        if !table.names.insert(room.name.clone()) {
            return Err(ChatError::RoomNameTaken(room.name));
        }
        table.by_id.insert(room.id.clone(), room);
        Ok(())
    }

    /// Looks up a room by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::RoomNotFound`] if no such room exists.
    pub async fn get(&self, id: &RoomId) -> Result<Room, ChatError> {
        self.table
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::RoomNotFound(id.to_string()))
    }

    /// Returns `true` if the room exists.
    pub async fn exists(&self, id: &RoomId) -> bool {
        self.table.read().await.by_id.contains_key(id)
    }

    /// Returns all rooms, oldest first (ties broken by name).
    pub async fn list(&self) -> Vec<Room> {
        let table = self.table.read().await;
        let mut rooms: Vec<Room> = table.by_id.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        rooms
    }

    /// Returns the number of rooms.
    pub async fn len(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    /// Returns `true` if there are no rooms.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.by_id.is_empty()
    }
}
