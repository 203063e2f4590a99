//! End-to-end tests: a real server on an ephemeral port, driven over REST
//! with `reqwest` and over WebSocket with `tokio-tungstenite`.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use chat_hub::app_state::AppState;
use chat_hub::config::ChatConfig;
use chat_hub::hub::Hub;
use chat_hub::server::build_app;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    hub: Hub,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let (hub, _task) = Hub::spawn(64);
        let app = build_app(AppState::from_config(&ChatConfig::default(), hub.clone()));
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            addr,
            hub,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    async fn post(&self, path: &str, body: Value) -> Value {
        let response =
            tokio_test::assert_ok!(self.http.post(self.url(path)).json(&body).send().await);
        assert!(response.status().is_success(), "POST {path} failed");
        tokio_test::assert_ok!(response.json::<Value>().await)
    }

    async fn get(&self, path: &str) -> Value {
        let response = tokio_test::assert_ok!(self.http.get(self.url(path)).send().await);
        tokio_test::assert_ok!(response.json::<Value>().await)
    }

    async fn user(&self, name: &str) -> String {
        id_of(&self.post("/api/v1/users", json!({ "username": name })).await)
    }

    async fn room(&self, name: &str) -> String {
        id_of(&self.post("/api/v1/rooms", json!({ "name": name })).await)
    }

    async fn connect(&self, room_id: &str, user_id: &str, extra: &str) -> Socket {
        let url = format!(
            "ws://{}/ws?room_id={room_id}&user_id={user_id}{extra}",
            self.addr
        );
        let Ok((socket, _)) = connect_async(url).await else {
            panic!("websocket connect failed");
        };
        socket
    }

    /// Polls `/stats` until `room_id` has `members` live connections.
    async fn wait_for_members(&self, room_id: &str, members: u64) {
        for _ in 0..100 {
            let stats = self.get("/stats").await;
            let current = stats
                .get("rooms")
                .and_then(|rooms| rooms.get(room_id))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            if current == members {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("room {room_id} never reached {members} members");
    }
}

fn id_of(value: &Value) -> String {
    let Some(id) = value.get("id").and_then(Value::as_str) else {
        panic!("response has no id: {value}");
    };
    id.to_string()
}

fn field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Next chat message on `socket`, skipping control frames.
async fn next_message(socket: &mut Socket) -> Value {
    loop {
        let Ok(Some(Ok(frame))) = tokio::time::timeout(Duration::from_secs(5), socket.next()).await
        else {
            panic!("no frame received");
        };
        if let WsMessage::Text(text) = frame {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("frame is not JSON: {text}");
            };
            return value;
        }
    }
}

#[tokio::test]
async fn members_receive_room_messages_in_order() {
    let server = TestServer::start().await;
    let alice = server.user("alice").await;
    let bob = server.user("bob").await;
    let room = server.room("general").await;

    let mut a = server.connect(&room, &alice, "").await;
    let mut b = server.connect(&room, &bob, "").await;
    server.wait_for_members(&room, 2).await;

    let path = format!("/api/v1/rooms/{room}/messages");
    server
        .post(&path, json!({ "user_id": alice, "content": "hello" }))
        .await;
    server
        .post(&path, json!({ "user_id": alice, "content": "world" }))
        .await;

    for socket in [&mut a, &mut b] {
        let first = next_message(socket).await;
        let second = next_message(socket).await;
        assert_eq!(field(&first, "content"), "hello");
        assert_eq!(field(&second, "content"), "world");
        assert_eq!(field(&first, "user_id"), alice);
        assert_eq!(field(&first, "username"), "alice");
        assert_eq!(field(&first, "room_id"), room);
    }
}

#[tokio::test]
async fn rooms_are_isolated() {
    let server = TestServer::start().await;
    let alice = server.user("alice").await;
    let bob = server.user("bob").await;
    let general = server.room("general").await;
    let random = server.room("random").await;

    let mut a = server.connect(&general, &alice, "").await;
    let mut b = server.connect(&random, &bob, "").await;
    server.wait_for_members(&general, 1).await;
    server.wait_for_members(&random, 1).await;

    server
        .post(
            &format!("/api/v1/rooms/{general}/messages"),
            json!({ "user_id": alice, "content": "only general" }),
        )
        .await;
    server
        .post(
            &format!("/api/v1/rooms/{random}/messages"),
            json!({ "user_id": bob, "content": "only random" }),
        )
        .await;

    assert_eq!(field(&next_message(&mut a).await, "content"), "only general");
    assert_eq!(field(&next_message(&mut b).await, "content"), "only random");
}

#[tokio::test]
async fn socket_send_is_broadcast_and_stored() {
    let server = TestServer::start().await;
    let alice = server.user("alice").await;
    let bob = server.user("bob").await;
    let room = server.room("general").await;

    let mut a = server.connect(&room, &alice, "").await;
    let mut b = server.connect(&room, &bob, "").await;
    server.wait_for_members(&room, 2).await;

    tokio_test::assert_ok!(a.send(WsMessage::text("not a command")).await);
    tokio_test::assert_ok!(
        a.send(WsMessage::text(
            json!({ "type": "send_message", "content": "over the socket" }).to_string()
        ))
        .await
    );

    let received = next_message(&mut b).await;
    assert_eq!(field(&received, "content"), "over the socket");
    assert_eq!(field(&received, "username"), "alice");

    let history = server
        .get(&format!("/api/v1/rooms/{room}/messages"))
        .await;
    let contents: Vec<&str> = history
        .get("data")
        .and_then(Value::as_array)
        .map(|data| data.iter().map(|m| field(m, "content")).collect())
        .unwrap_or_default();
    assert_eq!(contents, vec!["over the socket"]);
}

#[tokio::test]
async fn suppress_echo_hides_own_messages() {
    let server = TestServer::start().await;
    let alice = server.user("alice").await;
    let bob = server.user("bob").await;
    let room = server.room("general").await;

    let mut a = server.connect(&room, &alice, "&suppress_echo=true").await;
    server.wait_for_members(&room, 1).await;

    let path = format!("/api/v1/rooms/{room}/messages");
    server
        .post(&path, json!({ "user_id": alice, "content": "mine" }))
        .await;
    server
        .post(&path, json!({ "user_id": bob, "content": "theirs" }))
        .await;

    assert_eq!(field(&next_message(&mut a).await, "content"), "theirs");
}

#[tokio::test]
async fn missing_ids_are_rejected() {
    let server = TestServer::start().await;
    let user = server.user("alice").await;

    let url = format!("ws://{}/ws?user_id={user}", server.addr);
    let result = connect_async(url).await;
    let Err(tokio_tungstenite::tungstenite::Error::Http(response)) = result else {
        panic!("connection without room_id should be refused");
    };
    assert_eq!(response.status().as_u16(), 400);

    let stats = server.get("/stats").await;
    assert_eq!(stats.get("connection_count").and_then(Value::as_u64), Some(0));
}

#[tokio::test]
async fn closing_a_socket_leaves_the_room() {
    let server = TestServer::start().await;
    let alice = server.user("alice").await;
    let bob = server.user("bob").await;
    let room = server.room("general").await;

    let _a = server.connect(&room, &alice, "").await;
    let mut b = server.connect(&room, &bob, "").await;
    server.wait_for_members(&room, 2).await;

    tokio_test::assert_ok!(b.close(None).await);
    server.wait_for_members(&room, 1).await;
}

#[tokio::test]
async fn hub_shutdown_closes_live_sockets() {
    let server = TestServer::start().await;
    let alice = server.user("alice").await;
    let room = server.room("general").await;

    let mut a = server.connect(&room, &alice, "").await;
    server.wait_for_members(&room, 1).await;

    server.hub.shutdown().await;

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(frame)) = a.next().await {
            if frame.is_close() {
                return true;
            }
        }
        true
    })
    .await;
    assert!(matches!(closed, Ok(true)), "socket stayed open after hub shutdown");
}
