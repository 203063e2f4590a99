//! In-memory message history, one ordered log per room.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{Message, RoomId};

/// Append-only per-room message log with paginated reads.
///
/// Each room's log is kept sorted by `created_at` ascending on insert;
/// messages with equal timestamps keep their append order.
#[derive(Debug, Default)]
pub struct MessageStore {
    rooms: RwLock<HashMap<RoomId, Vec<Message>>>,
}

impl MessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to its room's log.
    pub async fn append(&self, message: Message) {
        let mut rooms = self.rooms.write().await;
        let log = rooms.entry(message.room_id.clone()).or_default();
        let at = log.partition_point(|m| m.created_at <= message.created_at);
        log.insert(at, message);
    }

    /// Returns up to `limit` messages of `room_id` starting at `offset`, in
    /// creation order.
    ///
    /// Unknown rooms and offsets past the end yield an empty page.
    pub async fn list_by_room(&self, room_id: &RoomId, limit: usize, offset: usize) -> Vec<Message> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map(|log| log.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default()
    }
}
