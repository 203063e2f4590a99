//! Service layer: use-case orchestration.
//!
//! Services validate input, talk to the in-memory stores and, for new
//! messages, hand off to the [`crate::hub::Hub`] for live delivery.

pub mod message_service;
pub mod room_service;
pub mod user_service;

pub use message_service::{HistoryPolicy, MessageService};
pub use room_service::RoomService;
pub use user_service::UserService;
