//! WebSocket layer: upgrade, per-connection tasks and inbound frames.
//!
//! The endpoint at `/ws` joins one room as one user. Outbound traffic comes
//! from the [`crate::hub::Hub`]; inbound `send_message` frames go through
//! [`crate::service::MessageService`] like REST posts do.

pub mod connection;
pub mod handler;
pub mod lifecycle;
pub mod messages;
