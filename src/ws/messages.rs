//! Inbound WebSocket frame types.
//!
//! Outbound frames are plain serialized [`crate::domain::Message`] objects
//! (see [`crate::hub::OutboundFrame`]). Inbound text frames carry a small
//! tagged command envelope.

use serde::Deserialize;

/// Commands a client can send over an open connection.
///
/// ```json
/// {"type": "send_message", "content": "hello"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Post a message to the connection's room as the connection's user.
    SendMessage {
        /// Message text.
        content: String,
    },
}

/// Why an inbound frame was skipped.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The text frame is not a valid command.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Binary frames carry no commands.
    #[error("binary frames are not supported")]
    Binary,
}

/// Decodes a text frame into a [`ClientCommand`].
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if the text is not valid JSON or names
/// an unknown command.
pub fn decode_client_frame(text: &str) -> Result<ClientCommand, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_send_message() {
        let Ok(cmd) = decode_client_frame(r#"{"type":"send_message","content":"hi"}"#) else {
            panic!("should decode");
        };
        assert_eq!(
            cmd,
            ClientCommand::SendMessage {
                content: "hi".to_string()
            }
        );
    }

    #[test]
    fn rejects_garbage_and_unknown_commands() {
        assert!(decode_client_frame("not json").is_err());
        assert!(decode_client_frame(r#"{"type":"teleport"}"#).is_err());
        assert!(decode_client_frame(r#"{"type":"send_message"}"#).is_err());
    }
}
