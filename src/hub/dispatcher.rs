//! The hub control loop and its cloneable handle.
//!
//! [`Hub`] is a handle to a single tokio task that owns the [`RoomIndex`].
//! Registrations, unregistrations, broadcasts and snapshot queries travel
//! over one bounded channel and are applied strictly one at a time, so
//! membership changes never interleave with a fan-out pass.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::member::{Member, MemberKey};
use super::room_index::RoomIndex;
use super::OutboundFrame;
use crate::domain::{Message, RoomId};

/// Requests processed by the control loop.
#[derive(Debug)]
enum HubCommand {
    Register(Member),
    Unregister(MemberKey),
    Broadcast { room_id: RoomId, message: Message },
    Snapshot(oneshot::Sender<HubSnapshot>),
    Shutdown,
}

/// Point-in-time view of the room index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HubSnapshot {
    /// Room id → number of live connections.
    pub rooms: BTreeMap<RoomId, usize>,
}

impl HubSnapshot {
    /// Number of non-empty rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Total live connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.rooms.values().sum()
    }

    /// Live connections in `room_id` (zero for unknown rooms).
    #[must_use]
    pub fn members_in(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).copied().unwrap_or(0)
    }

    /// Returns `true` if `room_id` has an entry.
    #[must_use]
    pub fn has_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }
}

/// Handle to the hub control loop.
///
/// Cheap to clone; every clone talks to the same task. Methods only wait to
/// enter the request channel, never on consumer speed. Once the loop has
/// stopped, every method is a silent no-op.
#[derive(Debug, Clone)]
pub struct Hub {
    commands: mpsc::Sender<HubCommand>,
}

impl Hub {
    /// Spawns the control loop on the current tokio runtime.
    ///
    /// `command_capacity` bounds the request channel (raised to at least 1).
    /// The returned [`JoinHandle`] completes after [`Hub::shutdown`] or once
    /// every handle has been dropped.
    #[must_use]
    pub fn spawn(command_capacity: usize) -> (Self, JoinHandle<()>) {
        let (commands, rx) = mpsc::channel(command_capacity.max(1));
        let task = tokio::spawn(run(rx));
        (Self { commands }, task)
    }

    /// Adds a connection to its room.
    ///
    /// If the hub has stopped, the member is dropped, which closes its queue.
    pub async fn register(&self, member: Member) {
        if self.commands.send(HubCommand::Register(member)).await.is_err() {
            tracing::debug!("hub stopped; registration dropped");
        }
    }

    /// Removes a connection from its room and closes its outbound queue.
    ///
    /// Idempotent: unknown or already-removed keys are ignored.
    pub async fn unregister(&self, key: MemberKey) {
        if self.commands.send(HubCommand::Unregister(key)).await.is_err() {
            tracing::debug!("hub stopped; unregistration dropped");
        }
    }

    /// Fans `message` out to every member of `room_id`.
    ///
    /// Fire-and-forget: empty rooms and evictions are not reported.
    pub async fn broadcast(&self, room_id: RoomId, message: Message) {
        let command = HubCommand::Broadcast { room_id, message };
        if self.commands.send(command).await.is_err() {
            tracing::debug!("hub stopped; broadcast dropped");
        }
    }

    /// Returns the membership as seen after all previously submitted
    /// requests from this caller have been applied.
    ///
    /// A stopped hub reports an empty snapshot.
    pub async fn snapshot(&self) -> HubSnapshot {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(HubCommand::Snapshot(reply)).await.is_err() {
            return HubSnapshot::default();
        }
        rx.await.unwrap_or_default()
    }

    /// Stops the control loop once the request in flight is done. All
    /// outbound queues are closed.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(HubCommand::Shutdown).await;
    }

    /// Returns `true` while the control loop accepts requests.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}

async fn run(mut commands: mpsc::Receiver<HubCommand>) {
    let mut index = RoomIndex::new();
    tracing::info!("hub started");

    while let Some(command) = commands.recv().await {
        match command {
            HubCommand::Register(member) => {
                let connection_id = member.id();
                let room_id = member.room_id().clone();
                let user_id = member.user_id().clone();
                let members = index.insert(member);
                tracing::info!(
                    %connection_id,
                    %room_id,
                    %user_id,
                    members,
                    connections = index.connection_count(),
                    "connection registered"
                );
            }
            HubCommand::Unregister(key) => {
                if let Some(member) = index.remove(&key) {
                    drop(member);
                    tracing::info!(
                        connection_id = %key.connection_id,
                        room_id = %key.room_id,
                        members = index.member_count(&key.room_id),
                        "connection unregistered"
                    );
                }
            }
            HubCommand::Broadcast { room_id, message } => {
                dispatch(&mut index, &room_id, &message);
            }
            HubCommand::Snapshot(reply) => {
                let _ = reply.send(HubSnapshot {
                    rooms: index.snapshot(),
                });
            }
            HubCommand::Shutdown => break,
        }
    }

    let closed = index.drain().len();
    tracing::info!(closed, "hub stopped");
}

fn dispatch(index: &mut RoomIndex, room_id: &RoomId, message: &Message) {
    if !index.contains_room(room_id) {
        tracing::debug!(%room_id, "no live members; broadcast skipped");
        return;
    }

    let frame = match OutboundFrame::encode(message) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(%room_id, message_id = %message.id, error = %e, "failed to encode message");
            return;
        }
    };

    let outcome = index.fan_out(room_id, &frame);
    for evicted in &outcome.evicted {
        tracing::warn!(
            connection_id = %evicted.member.id(),
            user_id = %evicted.member.user_id(),
            %room_id,
            reason = ?evicted.reason,
            "evicting unresponsive connection"
        );
    }
    tracing::debug!(
        %room_id,
        message_id = %message.id,
        delivered = outcome.delivered,
        evicted = outcome.evicted.len(),
        "broadcast dispatched"
    );
}
