//! Chat room metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RoomId;

/// A named room. Live membership is tracked by the hub, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Human-readable room name (unique).
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Creates a new room with a fresh identifier.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: RoomId::generate(),
            name,
            created_at: Utc::now(),
        }
    }
}
