//! Registered chat user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A user known to the service. Usernames are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name shown next to the user's messages.
    pub username: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh identifier.
    #[must_use]
    pub fn new(username: String) -> Self {
        Self {
            id: UserId::generate(),
            username,
            created_at: Utc::now(),
        }
    }
}
