//! Persistence layer: in-memory user, room and message stores.
//!
//! Each store is a keyed map behind a [`tokio::sync::RwLock`]. Nothing is
//! written to disk; history lives as long as the process.

pub mod message_store;
pub mod room_store;
pub mod user_store;

pub use message_store::MessageStore;
pub use room_store::RoomStore;
pub use user_store::UserStore;
