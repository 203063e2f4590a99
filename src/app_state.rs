//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::hub::Hub;
use crate::persistence::{MessageStore, RoomStore, UserStore};
use crate::service::{HistoryPolicy, MessageService, RoomService, UserService};
use crate::ws::connection::{ConnectionContext, ConnectionSettings};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// User registration and lookup.
    pub users: Arc<UserService>,
    /// Room creation and listing.
    pub rooms: Arc<RoomService>,
    /// Message posting and history.
    pub messages: Arc<MessageService>,
    /// Broadcast hub.
    pub hub: Hub,
    /// Per-connection knobs handed to every WebSocket.
    pub connection_settings: ConnectionSettings,
}

impl AppState {
    /// Wires fresh in-memory stores and services around a running `hub`.
    #[must_use]
    pub fn from_config(config: &ChatConfig, hub: Hub) -> Self {
        let users = Arc::new(UserStore::new());
        let rooms = Arc::new(RoomStore::new());
        let history = HistoryPolicy {
            default_limit: config.history_default_limit,
            max_limit: config.history_max_limit,
        };
        let messages = Arc::new(MessageService::new(
            Arc::new(MessageStore::new()),
            Arc::clone(&users),
            Arc::clone(&rooms),
            hub.clone(),
            history,
        ));

        Self {
            users: Arc::new(UserService::new(users)),
            rooms: Arc::new(RoomService::new(rooms)),
            messages,
            hub,
            connection_settings: ConnectionSettings::from(config),
        }
    }

    /// Collaborators for a newly upgraded WebSocket.
    #[must_use]
    pub fn connection_context(&self) -> ConnectionContext {
        ConnectionContext {
            hub: self.hub.clone(),
            messages: Arc::clone(&self.messages),
            settings: self.connection_settings,
        }
    }
}
