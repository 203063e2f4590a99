//! # chat-hub
//!
//! Real-time chat rooms over WebSocket, with REST endpoints for users,
//! rooms and paginated message history.
//!
//! Every message posted to a room (over REST or over the socket) is stored
//! and then handed to a single [`hub::Hub`] task that fans it out to each
//! live connection in that room. Fan-out never waits on a slow consumer:
//! a connection whose outbound queue is full is evicted instead.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler + Connection paths (ws/)
//!     │
//!     ├── User / Room / Message services (service/)
//!     │
//!     ├── Hub control loop ── Room Index (hub/)
//!     │
//!     └── In-memory stores (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod hub;
pub mod openapi;
pub mod persistence;
pub mod server;
pub mod service;
pub mod ws;
