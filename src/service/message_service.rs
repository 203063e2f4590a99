//! Message service: validates, stores and broadcasts chat messages.

use std::sync::Arc;

use crate::domain::{Message, RoomId, UserId};
use crate::error::ChatError;
use crate::hub::Hub;
use crate::persistence::{MessageStore, RoomStore, UserStore};

/// Page-size policy for history reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPolicy {
    /// Page size used when the caller gives none (or zero).
    pub default_limit: usize,
    /// Largest page size honored.
    pub max_limit: usize,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 100,
        }
    }
}

impl HistoryPolicy {
    /// Resolves a requested `(limit, offset)` pair into the effective one.
    #[must_use]
    pub fn resolve(&self, limit: Option<usize>, offset: Option<usize>) -> (usize, usize) {
        let limit = match limit {
            None | Some(0) => self.default_limit,
            Some(n) => n.min(self.max_limit),
        };
        (limit, offset.unwrap_or(0))
    }
}

/// Producer side of the chat: every accepted message is appended to history
/// and then handed to the [`Hub`] for live delivery.
///
/// All validation happens here; the hub never sees an invalid message.
#[derive(Debug, Clone)]
pub struct MessageService {
    messages: Arc<MessageStore>,
    users: Arc<UserStore>,
    rooms: Arc<RoomStore>,
    hub: Hub,
    history: HistoryPolicy,
}

impl MessageService {
    /// Creates a new `MessageService`.
    #[must_use]
    pub fn new(
        messages: Arc<MessageStore>,
        users: Arc<UserStore>,
        rooms: Arc<RoomStore>,
        hub: Hub,
        history: HistoryPolicy,
    ) -> Self {
        Self {
            messages,
            users,
            rooms,
            hub,
            history,
        }
    }

    /// Returns a reference to the inner [`Hub`].
    #[must_use]
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Paging policy applied by [`Self::history`].
    #[must_use]
    pub const fn history_policy(&self) -> HistoryPolicy {
        self.history
    }

    /// Posts `content` from `user_id` into `room_id`.
    ///
    /// On success the message is in history and has been submitted for
    /// broadcast to every live member of the room, the author included.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EmptyContent`] for blank content,
    /// [`ChatError::UserNotFound`] for an unknown author and
    /// [`ChatError::RoomNotFound`] for an unknown room.
    pub async fn send(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        content: &str,
    ) -> Result<Message, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::EmptyContent);
        }
        let author = self.users.get(user_id).await?;
        if !self.rooms.exists(room_id).await {
            return Err(ChatError::RoomNotFound(room_id.to_string()));
        }

        let message = Message::new(room_id.clone(), &author, content.to_string());
        self.messages.append(message.clone()).await;
        self.hub.broadcast(room_id.clone(), message.clone()).await;

        tracing::debug!(%room_id, %user_id, message_id = %message.id, "message sent");
        Ok(message)
    }

    /// Reads a page of `room_id`'s history in creation order.
    ///
    /// `limit` defaults and is capped per [`HistoryPolicy`]; `offset`
    /// defaults to 0. Unknown rooms yield an empty page.
    pub async fn history(
        &self,
        room_id: &RoomId,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Vec<Message> {
        let (limit, offset) = self.history.resolve(limit, offset);
        self.messages.list_by_room(room_id, limit, offset).await
    }
}
