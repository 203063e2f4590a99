//! Serialized outbound frames.
//!
//! A message is encoded once per broadcast; every member's queue receives a
//! cheap clone of the same bytes.

use axum::extract::ws::Utf8Bytes;

use crate::domain::{Message, UserId};

/// One encoded chat message ready to be written to a socket.
///
/// Carries the author alongside the payload so the writer path can apply a
/// per-recipient [`crate::domain::InterestFilter`] without decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    author: UserId,
    payload: Utf8Bytes,
}

impl OutboundFrame {
    /// Encodes `message` as a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialization fails.
    pub fn encode(message: &Message) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(message)?;
        Ok(Self {
            author: message.user_id.clone(),
            payload: Utf8Bytes::from(json),
        })
    }

    /// Author of the encoded message.
    #[must_use]
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Encoded payload as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.payload.as_str()
    }

    /// Consumes the frame, returning the payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Utf8Bytes {
        self.payload
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, User};

    #[test]
    fn encode_keeps_author_and_content() {
        let author = User::new("alice".to_string());
        let msg = Message::new(RoomId::generate(), &author, "hello".to_string());
        let Ok(frame) = OutboundFrame::encode(&msg) else {
            panic!("encoding failed");
        };
        assert_eq!(frame.author(), &author.id);

        let Ok(decoded) = serde_json::from_str::<Message>(frame.as_str()) else {
            panic!("payload is not a message");
        };
        assert_eq!(decoded, msg);
    }
}
