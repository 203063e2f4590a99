//! User registration and lookup.

use std::sync::Arc;

use crate::domain::{User, UserId};
use crate::error::ChatError;
use crate::persistence::UserStore;

/// Use cases around users.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<UserStore>,
}

impl UserService {
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }

    /// Registers a new user under `username` (surrounding whitespace is
    /// trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidRequest`] for an empty username and
    /// [`ChatError::UsernameTaken`] if it is already registered.
    pub async fn register(&self, username: &str) -> Result<User, ChatError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ChatError::InvalidRequest(
                "username cannot be empty".to_string(),
            ));
        }

        let user = User::new(username.to_string());
        self.users.insert(user.clone()).await?;
        tracing::info!(user_id = %user.id, username, "user registered");
        Ok(user)
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UserNotFound`] if the user does not exist.
    pub async fn get(&self, id: &UserId) -> Result<User, ChatError> {
        self.users.get(id).await
    }

    /// Looks up a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UserNotFound`] if no user has this username.
    pub async fn get_by_username(&self, username: &str) -> Result<User, ChatError> {
        self.users.get_by_username(username).await
    }
}
