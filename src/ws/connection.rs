//! WebSocket connection: writer path, reader path and their supervisor.
//!
//! Each connection runs two tasks that share nothing but the outbound queue
//! and the [`Lifecycle`] flag:
//!
//! - the **writer** drains the queue onto the socket and sends keepalive
//!   pings on its own timer;
//! - the **reader** decodes inbound frames, forwards commands to the
//!   [`MessageService`], and enforces the read deadline.
//!
//! Whichever path ends first triggers [`Closer::close`], which unregisters
//! the connection from the hub. The hub then drops the queue sender, which
//! ends the writer.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::task::JoinError;
use tokio::time::{Instant, MissedTickBehavior};

use super::lifecycle::Lifecycle;
use super::messages::{ClientCommand, DecodeError, decode_client_frame};
use crate::config::ChatConfig;
use crate::domain::{InterestFilter, RoomId, UserId};
use crate::hub::{ConnectionId, Hub, Member, MemberKey, OutboundQueue};
use crate::service::MessageService;

/// Timing and sizing knobs for a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Outbound queue capacity.
    pub queue_capacity: usize,
    /// Keepalive ping period.
    pub ping_interval: Duration,
    /// Read deadline: longest silence tolerated from the client.
    pub pong_wait: Duration,
    /// Longest time a single frame write may take.
    pub write_wait: Duration,
    /// Largest inbound message accepted, in bytes.
    pub max_message_bytes: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for ConnectionSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            queue_capacity: config.outbound_queue_capacity,
            ping_interval: config.ping_interval(),
            pong_wait: config.pong_wait(),
            write_wait: config.write_wait(),
            max_message_bytes: config.max_message_bytes,
        }
    }
}

/// Identity a connection was opened with. Fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Connected user.
    pub user_id: UserId,
    /// Joined room.
    pub room_id: RoomId,
    /// Hide the user's own messages on this connection.
    pub suppress_echo: bool,
}

impl Session {
    /// The delivery filter for this session.
    #[must_use]
    pub fn interest_filter(&self) -> InterestFilter {
        if self.suppress_echo {
            InterestFilter::suppressing_echo(self.user_id.clone())
        } else {
            InterestFilter::new(self.user_id.clone())
        }
    }
}

/// Shared collaborators every connection needs.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    /// Broadcast hub.
    pub hub: Hub,
    /// Domain entry point for inbound commands.
    pub messages: Arc<MessageService>,
    /// Connection knobs.
    pub settings: ConnectionSettings,
}

/// Starts teardown of one connection, at most once.
#[derive(Debug, Clone)]
pub struct Closer {
    hub: Hub,
    key: MemberKey,
    lifecycle: Arc<Lifecycle>,
}

impl Closer {
    /// Creates a closer for the member identified by `key`.
    #[must_use]
    pub fn new(hub: Hub, key: MemberKey, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            hub,
            key,
            lifecycle,
        }
    }

    /// Moves the connection to `Closing` and unregisters it from the hub.
    ///
    /// Returns `false` (and does nothing) if teardown already started.
    pub async fn close(&self, reason: &str) -> bool {
        if !self.lifecycle.begin_closing() {
            return false;
        }
        tracing::debug!(
            connection_id = %self.key.connection_id,
            room_id = %self.key.room_id,
            reason,
            "closing connection"
        );
        self.hub.unregister(self.key.clone()).await;
        true
    }
}

/// How the writer path ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The hub closed the outbound queue.
    QueueClosed,
    /// The transport rejected a frame.
    WriteFailed(String),
    /// A frame did not go out within the write deadline.
    WriteTimedOut,
}

/// How the reader path ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The client sent a close frame.
    ClosedByPeer,
    /// The transport ended without a close frame.
    StreamEnded,
    /// The transport reported an error.
    ReadFailed(String),
    /// Nothing arrived within the read deadline.
    DeadlineExpired,
}

/// Reader path collaborators.
#[derive(Debug, Clone)]
pub struct ReaderContext {
    /// Connection identity.
    pub session: Session,
    /// Where decoded commands go.
    pub messages: Arc<MessageService>,
    /// Teardown trigger.
    pub closer: Closer,
    /// Read deadline window.
    pub pong_wait: Duration,
}

/// Drains `queue` onto `sink` until the queue closes or a write fails.
///
/// Frames the `filter` rejects are dropped. A ping is sent every
/// `settings.ping_interval`. The sink is closed on exit.
pub async fn write_pump<S>(
    mut sink: S,
    mut queue: OutboundQueue,
    filter: InterestFilter,
    settings: ConnectionSettings,
) -> WriteOutcome
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    let mut keepalive = tokio::time::interval_at(
        Instant::now() + settings.ping_interval,
        settings.ping_interval,
    );
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let outcome = loop {
        tokio::select! {
            next = queue.recv() => {
                let Some(frame) = next else {
                    let _ = send_within(&mut sink, WsMessage::Close(None), settings.write_wait).await;
                    break WriteOutcome::QueueClosed;
                };
                if filter.accepts(frame.author()) {
                    let text = WsMessage::Text(frame.into_payload());
                    if let Err(outcome) = send_within(&mut sink, text, settings.write_wait).await {
                        break outcome;
                    }
                }
            }
            _ = keepalive.tick() => {
                let ping = WsMessage::Ping(Bytes::new());
                if let Err(outcome) = send_within(&mut sink, ping, settings.write_wait).await {
                    break outcome;
                }
            }
        }
    };

    let _ = sink.close().await;
    outcome
}

async fn send_within<S>(sink: &mut S, message: WsMessage, deadline: Duration) -> Result<(), WriteOutcome>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    match tokio::time::timeout(deadline, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WriteOutcome::WriteFailed(e.to_string())),
        Err(_) => Err(WriteOutcome::WriteTimedOut),
    }
}

/// Reads frames from `stream` until the transport fails, the peer closes,
/// or the read deadline lapses; then closes the connection.
///
/// Every inbound frame, pongs included, restarts the deadline. Undecodable
/// frames and rejected commands are logged and skipped.
pub async fn read_pump<R, E>(mut stream: R, ctx: ReaderContext) -> ReadOutcome
where
    R: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    let outcome = loop {
        let frame = match tokio::time::timeout(ctx.pong_wait, stream.next()).await {
            Err(_) => break ReadOutcome::DeadlineExpired,
            Ok(None) => break ReadOutcome::StreamEnded,
            Ok(Some(Err(e))) => break ReadOutcome::ReadFailed(e.to_string()),
            Ok(Some(Ok(frame))) => frame,
        };

        match frame {
            WsMessage::Text(text) => forward(&ctx, decode_client_frame(text.as_str())).await,
            WsMessage::Binary(_) => forward(&ctx, Err(DecodeError::Binary)).await,
            WsMessage::Ping(_) | WsMessage::Pong(_) => {}
            WsMessage::Close(_) => break ReadOutcome::ClosedByPeer,
        }
    };

    if outcome == ReadOutcome::DeadlineExpired {
        tracing::warn!(
            user_id = %ctx.session.user_id,
            room_id = %ctx.session.room_id,
            pong_wait_ms = ctx.pong_wait.as_millis(),
            "read deadline expired"
        );
    } else {
        tracing::debug!(
            user_id = %ctx.session.user_id,
            room_id = %ctx.session.room_id,
            outcome = ?outcome,
            "reader stopped"
        );
    }
    ctx.closer.close("reader stopped").await;
    outcome
}

async fn forward(ctx: &ReaderContext, decoded: Result<ClientCommand, DecodeError>) {
    let session = &ctx.session;
    match decoded {
        Ok(ClientCommand::SendMessage { content }) => {
            if let Err(e) = ctx
                .messages
                .send(&session.room_id, &session.user_id, &content)
                .await
            {
                tracing::warn!(
                    user_id = %session.user_id,
                    room_id = %session.room_id,
                    error = %e,
                    "inbound message rejected"
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                user_id = %session.user_id,
                room_id = %session.room_id,
                error = %e,
                "skipping inbound frame"
            );
        }
    }
}

/// Runs one WebSocket connection from registration to teardown.
pub async fn run_connection(socket: WebSocket, session: Session, ctx: ConnectionContext) {
    let lifecycle = Arc::new(Lifecycle::new());
    let (member, queue) = Member::channel(
        session.user_id.clone(),
        session.room_id.clone(),
        ctx.settings.queue_capacity,
    );
    let connection_id = member.id();
    let closer = Closer::new(ctx.hub.clone(), member.key(), Arc::clone(&lifecycle));

    ctx.hub.register(member).await;
    lifecycle.mark_registered();

    let (sink, stream) = socket.split();
    let mut writer = tokio::spawn(write_pump(
        sink,
        queue,
        session.interest_filter(),
        ctx.settings,
    ));
    let mut reader = tokio::spawn(read_pump(
        stream,
        ReaderContext {
            session: session.clone(),
            messages: Arc::clone(&ctx.messages),
            closer: closer.clone(),
            pong_wait: ctx.settings.pong_wait,
        },
    ));
    lifecycle.mark_active();
    tracing::debug!(%connection_id, user_id = %session.user_id, room_id = %session.room_id, "connection active");

    let writer_first = tokio::select! {
        outcome = &mut reader => {
            log_path_end(connection_id, "reader", outcome);
            false
        }
        outcome = &mut writer => {
            log_path_end(connection_id, "writer", outcome);
            true
        }
    };

    closer.close("connection path ended").await;
    if writer_first {
        reader.abort();
        let _ = reader.await;
    } else {
        log_path_end(connection_id, "writer", writer.await);
    }

    lifecycle.mark_closed();
    tracing::info!(
        %connection_id,
        user_id = %session.user_id,
        room_id = %session.room_id,
        state = ?lifecycle.state(),
        "connection closed"
    );
}

fn log_path_end<T: std::fmt::Debug>(
    connection_id: ConnectionId,
    path: &str,
    outcome: Result<T, JoinError>,
) {
    match outcome {
        Ok(outcome) => tracing::debug!(%connection_id, path, ?outcome, "connection path ended"),
        Err(e) => tracing::warn!(%connection_id, path, error = %e, "connection path aborted"),
    }
}
