//! Type-safe identifiers for users, rooms, and messages.
//!
//! [`UserId`] and [`RoomId`] are opaque, non-empty strings: the hub never
//! interprets them beyond equality and hashing. [`MessageId`] wraps a UUID v4
//! generated when the message is created.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Identifier of a registered user.
///
/// Generated as a UUID v4 string at registration, but any non-empty string
/// presented at the WebSocket boundary is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new random `UserId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Validates and wraps an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidRequest`] if `raw` is empty or whitespace.
    pub fn parse(raw: &str) -> Result<Self, ChatError> {
        non_empty(raw, "user_id").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a chat room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Creates a new random `RoomId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Validates and wraps an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidRequest`] if `raw` is empty or whitespace.
    pub fn parse(raw: &str) -> Result<Self, ChatError> {
        non_empty(raw, "room_id").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a chat message (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(uuid::Uuid);

impl MessageId {
    /// Creates a new random `MessageId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn non_empty(raw: &str, field: &str) -> Result<String, ChatError> {
    if raw.trim().is_empty() {
        return Err(ChatError::InvalidRequest(format!("{field} is required")));
    }
    Ok(raw.to_string())
}
