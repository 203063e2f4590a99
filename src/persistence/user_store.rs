//! In-memory user storage with a unique username index.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{User, UserId};
use crate::error::ChatError;

#[derive(Debug, Default)]
struct UserTable {
    by_id: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
}

/// Keyed map of registered users.
///
/// Both indexes live behind one [`RwLock`] so the username uniqueness check
/// and the insert happen atomically.
#[derive(Debug, Default)]
pub struct UserStore {
    table: RwLock<UserTable>,
}

impl UserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UsernameTaken`] if the username is already
    /// registered.
    pub async fn insert(&self, user: User) -> Result<(), ChatError> {
        let mut table = self.table.write().await;
        if table.by_username.contains_key(&user.username) {
            return Err(ChatError::UsernameTaken(user.username));
        }
        table
            .by_username
            .insert(user.username.clone(), user.id.clone());
        table.by_id.insert(user.id.clone(), user);
        Ok(())
    }

    /// Looks up a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UserNotFound`] if no such user exists.
    pub async fn get(&self, id: &UserId) -> Result<User, ChatError> {
        let table = self.table.read().await;
        table
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ChatError::UserNotFound(id.to_string()))
    }

    /// Looks up a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UserNotFound`] if no user has this username.
    pub async fn get_by_username(&self, username: &str) -> Result<User, ChatError> {
        let table = self.table.read().await;
        table
            .by_username
            .get(username)
            .and_then(|id| table.by_id.get(id))
            .cloned()
            .ok_or_else(|| ChatError::UserNotFound(username.to_string()))
    }

    /// Returns the number of registered users.
    pub async fn len(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    /// Returns `true` if no users are registered.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.by_id.is_empty()
    }
}
