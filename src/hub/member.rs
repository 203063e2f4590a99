//! Hub-side handle of a live connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::OutboundFrame;
use crate::domain::{RoomId, UserId};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local connection handle. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocates the next identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Everything the hub needs to find a member again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    /// Connection handle.
    pub connection_id: ConnectionId,
    /// Room the connection joined. Fixed for the connection's lifetime.
    pub room_id: RoomId,
}

/// Receiving end of a member's outbound queue, drained by the writer path.
pub type OutboundQueue = mpsc::Receiver<OutboundFrame>;

/// Why a frame could not be enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// The queue is at capacity: the consumer is not keeping up.
    Full,
    /// The writer path is gone.
    Disconnected,
}

/// A connection as seen by the hub: identity plus the only sender of its
/// outbound queue.
///
/// `Member` is not `Clone`: the hub owns the single sender, so dropping the
/// `Member` closes the queue exactly once.
#[derive(Debug)]
pub struct Member {
    id: ConnectionId,
    user_id: UserId,
    room_id: RoomId,
    outbound: mpsc::Sender<OutboundFrame>,
}

impl Member {
    /// Creates a member and its bounded outbound queue.
    ///
    /// A `capacity` of zero is raised to one.
    #[must_use]
    pub fn channel(user_id: UserId, room_id: RoomId, capacity: usize) -> (Self, OutboundQueue) {
        let (outbound, queue) = mpsc::channel(capacity.max(1));
        let member = Self {
            id: ConnectionId::next(),
            user_id,
            room_id,
            outbound,
        };
        (member, queue)
    }

    /// Connection handle.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// User the connection was opened for.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Room the connection belongs to.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Lookup key for [`super::Hub::unregister`].
    #[must_use]
    pub fn key(&self) -> MemberKey {
        MemberKey {
            connection_id: self.id,
            room_id: self.room_id.clone(),
        }
    }

    /// Enqueues `frame` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`EnqueueError::Full`] when the queue is at capacity and
    /// [`EnqueueError::Disconnected`] when the writer path has gone away.
    pub fn try_enqueue(&self, frame: &OutboundFrame) -> Result<(), EnqueueError> {
        self.outbound
            .try_send(frame.clone())
            .map_err(|err| match err {
                TrySendError::Full(_) => EnqueueError::Full,
                TrySendError::Closed(_) => EnqueueError::Disconnected,
            })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Message, User};

    fn frame() -> OutboundFrame {
        let author = User::new("alice".to_string());
        let msg = Message::new(RoomId::generate(), &author, "x".to_string());
        let Ok(frame) = OutboundFrame::encode(&msg) else {
            panic!("encoding failed");
        };
        frame
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(ConnectionId::next(), ConnectionId::next());
    }

    #[test]
    fn full_queue_reports_full() {
        let (member, _queue) = Member::channel(UserId::generate(), RoomId::generate(), 1);
        let f = frame();
        assert_eq!(member.try_enqueue(&f), Ok(()));
        assert_eq!(member.try_enqueue(&f), Err(EnqueueError::Full));
    }

    #[test]
    fn dropped_queue_reports_disconnected() {
        let (member, queue) = Member::channel(UserId::generate(), RoomId::generate(), 4);
        drop(queue);
        assert_eq!(member.try_enqueue(&frame()), Err(EnqueueError::Disconnected));
    }

    #[tokio::test]
    async fn dropping_member_closes_queue() {
        let (member, mut queue) = Member::channel(UserId::generate(), RoomId::generate(), 4);
        let _ = member.try_enqueue(&frame());
        drop(member);
        assert!(queue.recv().await.is_some());
        assert!(queue.recv().await.is_none());
    }
}
