//! System endpoints: health check and live hub statistics.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::hub::HubSnapshot;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Live connection counts as seen by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    /// Whether the hub control loop is still running.
    pub hub_running: bool,
    /// Rooms with at least one live connection.
    pub room_count: usize,
    /// Live connections across all rooms.
    pub connection_count: usize,
    /// Room id → live member count.
    pub rooms: BTreeMap<String, usize>,
}

impl StatsResponse {
    fn new(hub_running: bool, snapshot: &HubSnapshot) -> Self {
        Self {
            hub_running,
            room_count: snapshot.room_count(),
            connection_count: snapshot.connection_count(),
            rooms: snapshot
                .rooms
                .iter()
                .map(|(room, members)| (room.to_string(), *members))
                .collect(),
        }
    }
}

/// `GET /stats` — Hub snapshot.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "System",
    summary = "Live hub statistics",
    description = "Returns the rooms that currently have live WebSocket members and how many each has.",
    responses(
        (status = 200, description = "Hub snapshot", body = StatsResponse),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.hub.snapshot().await;
    Json(StatsResponse::new(state.hub.is_running(), &snapshot))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
}
