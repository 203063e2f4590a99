//! Data Transfer Objects for REST request/response serialization.
//!
//! Identifiers are exposed as plain strings; timestamps as RFC 3339.

pub mod common_dto;
pub mod message_dto;
pub mod room_dto;
pub mod user_dto;

pub use common_dto::*;
pub use message_dto::*;
pub use room_dto::*;
pub use user_dto::*;
