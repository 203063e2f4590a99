//! Domain layer: identifiers, users, rooms, messages, delivery filtering.
//!
//! These are plain data types shared by the stores, the services, the hub
//! and the WebSocket layer. None of them hold locks or channels.

pub mod ids;
pub mod interest;
pub mod message;
pub mod room;
pub mod user;

pub use ids::{MessageId, RoomId, UserId};
pub use interest::InterestFilter;
pub use message::Message;
pub use room::Room;
pub use user::User;
