//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` and `/stats`
//! sit at the root.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use super::*;
    use crate::api::dto::{RoomListResponse, RoomResponse, UserResponse};
    use crate::api::handlers::system::StatsResponse;
    use crate::config::ChatConfig;
    use crate::hub::Hub;

    fn app() -> Router {
        let (hub, _task) = Hub::spawn(16);
        build_router().with_state(AppState::from_config(&ChatConfig::default(), hub))
    }

    fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
        let Ok(request) = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("bad request");
        };
        request
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("bad request");
        };
        request
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let Ok(response) = app.clone().oneshot(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("unreadable body");
        };
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    fn decode<T: DeserializeOwned>(value: serde_json::Value) -> T {
        let Ok(decoded) = serde_json::from_value(value) else {
            panic!("unexpected response shape");
        };
        decoded
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let app = app();
        let (status, body) = call(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn user_registration_and_conflict() {
        let app = app();
        let body = serde_json::json!({"username": "  alice "});
        let (status, created) = call(&app, json_request(Method::POST, "/api/v1/users", &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let user: UserResponse = decode(created);
        assert_eq!(user.username, "alice");

        let (status, err) = call(&app, json_request(Method::POST, "/api/v1/users", &body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["error"]["code"], 2101);

        let (status, fetched) = call(&app, get(&format!("/api/v1/users/{}", user.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decode::<UserResponse>(fetched), user);

        let (status, _) = call(&app, get("/api/v1/users/nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rooms_create_list_and_get() {
        let app = app();
        for name in ["general", "random"] {
            let body = serde_json::json!({ "name": name });
            let (status, _) = call(&app, json_request(Method::POST, "/api/v1/rooms", &body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, _) = call(
            &app,
            json_request(Method::POST, "/api/v1/rooms", &serde_json::json!({"name": " "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = call(&app, get("/api/v1/rooms")).await;
        let list: RoomListResponse = decode(list);
        let names: Vec<&str> = list.data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["general", "random"]);

        let Some(first) = list.data.first() else {
            panic!("room list empty");
        };
        let (status, room) = call(&app, get(&format!("/api/v1/rooms/{}", first.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&decode::<RoomResponse>(room), first);
    }

    #[tokio::test]
    async fn post_and_page_messages() {
        let app = app();
        let (_, user) = call(
            &app,
            json_request(Method::POST, "/api/v1/users", &serde_json::json!({"username": "bob"})),
        )
        .await;
        let user: UserResponse = decode(user);
        let (_, room) = call(
            &app,
            json_request(Method::POST, "/api/v1/rooms", &serde_json::json!({"name": "general"})),
        )
        .await;
        let room: RoomResponse = decode(room);
        let uri = format!("/api/v1/rooms/{}/messages", room.id);

        for i in 0..5 {
            let body = serde_json::json!({"user_id": user.id, "content": format!("m{i}")});
            let (status, _) = call(&app, json_request(Method::POST, &uri, &body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let blank = serde_json::json!({"user_id": user.id, "content": "   "});
        let (status, err) = call(&app, json_request(Method::POST, &uri, &blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"]["code"], 1002);

        let (status, page) = call(&app, get(&format!("{uri}?limit=3&offset=0"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["page"]["limit"], 3);
        assert_eq!(page["data"][0]["content"], "m0");
        assert_eq!(page["data"][2]["content"], "m2");
        assert_eq!(page["page"]["count"], 3);

        let (_, tail) = call(&app, get(&format!("{uri}?limit=10&offset=4"))).await;
        assert_eq!(tail["page"]["count"], 1);
        assert_eq!(tail["data"][0]["content"], "m4");

        let (_, defaulted) = call(&app, get(&format!("{uri}?limit=0"))).await;
        assert_eq!(defaulted["page"]["limit"], 50);
        assert_eq!(defaulted["page"]["count"], 5);
    }

    #[tokio::test]
    async fn unknown_room_rejects_post_and_has_empty_history() {
        let app = app();
        let (_, user) = call(
            &app,
            json_request(Method::POST, "/api/v1/users", &serde_json::json!({"username": "carol"})),
        )
        .await;
        let user: UserResponse = decode(user);

        let body = serde_json::json!({"user_id": user.id, "content": "hi"});
        let (status, err) = call(
            &app,
            json_request(Method::POST, "/api/v1/rooms/ghost/messages", &body),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["error"]["code"], 2002);

        let (status, page) = call(&app, get("/api/v1/rooms/ghost/messages")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["page"]["count"], 0);
    }

    #[tokio::test]
    async fn stats_start_empty() {
        let app = app();
        let (status, stats) = call(&app, get("/stats")).await;
        assert_eq!(status, StatusCode::OK);
        let stats: StatsResponse = decode(stats);
        assert!(stats.hub_running);
        assert_eq!(stats.connection_count, 0);
        assert!(stats.rooms.is_empty());
    }
}
