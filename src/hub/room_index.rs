//! Room membership index owned by the hub control loop.
//!
//! Maps each room to the set of members currently joined. A room entry
//! exists if and only if it has at least one member. The index holds no
//! locks: it is only ever touched from the hub's single control task.

use std::collections::{BTreeMap, HashMap};

use super::member::{ConnectionId, EnqueueError, Member, MemberKey};
use super::OutboundFrame;
use crate::domain::RoomId;

/// A member removed during a fan-out pass.
#[derive(Debug)]
pub struct Evicted {
    /// The removed member. Dropping it closes its queue.
    pub member: Member,
    /// Why the enqueue failed.
    pub reason: EnqueueError,
}

/// Result of one fan-out pass.
#[derive(Debug, Default)]
pub struct FanOut {
    /// Members whose queue accepted the frame.
    pub delivered: usize,
    /// Members evicted after the pass.
    pub evicted: Vec<Evicted>,
}

/// Room id → members.
#[derive(Debug, Default)]
pub struct RoomIndex {
    rooms: HashMap<RoomId, HashMap<ConnectionId, Member>>,
}

impl RoomIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `member` to its room, creating the room entry if absent.
    ///
    /// Returns the room's member count afterwards.
    pub fn insert(&mut self, member: Member) -> usize {
        let members = self.rooms.entry(member.room_id().clone()).or_default();
        members.insert(member.id(), member);
        members.len()
    }

    /// Removes the member identified by `key`.
    ///
    /// Returns `None` if it is not (or no longer) a member. An emptied room
    /// entry is dropped.
    pub fn remove(&mut self, key: &MemberKey) -> Option<Member> {
        let members = self.rooms.get_mut(&key.room_id)?;
        let removed = members.remove(&key.connection_id);
        if members.is_empty() {
            self.rooms.remove(&key.room_id);
        }
        removed
    }

    /// Offers `frame` to every member of `room_id` without waiting, then
    /// evicts every member that could not take it.
    ///
    /// Enumeration and eviction happen within one `&mut self` borrow, so the
    /// pass always sees a consistent membership set.
    pub fn fan_out(&mut self, room_id: &RoomId, frame: &OutboundFrame) -> FanOut {
        let Some(members) = self.rooms.get(room_id) else {
            return FanOut::default();
        };

        let mut delivered = 0;
        let mut marked = Vec::new();
        for (id, member) in members {
            match member.try_enqueue(frame) {
                Ok(()) => delivered += 1,
                Err(reason) => marked.push((*id, reason)),
            }
        }

        let evicted = marked
            .into_iter()
            .filter_map(|(connection_id, reason)| {
                let key = MemberKey {
                    connection_id,
                    room_id: room_id.clone(),
                };
                self.remove(&key).map(|member| Evicted { member, reason })
            })
            .collect();

        FanOut { delivered, evicted }
    }

    /// Returns `true` if `room_id` has at least one member.
    #[must_use]
    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of members in `room_id`.
    #[must_use]
    pub fn member_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map_or(0, HashMap::len)
    }

    /// Number of non-empty rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Total number of members across all rooms.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.rooms.values().map(HashMap::len).sum()
    }

    /// Room id → member count, sorted by room id.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<RoomId, usize> {
        self.rooms
            .iter()
            .map(|(room, members)| (room.clone(), members.len()))
            .collect()
    }

    /// Removes every member, returning them.
    pub fn drain(&mut self) -> Vec<Member> {
        self.rooms
            .drain()
            .flat_map(|(_, members)| members.into_values())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Message, User, UserId};
    use crate::hub::OutboundQueue;

    fn join(index: &mut RoomIndex, room: &RoomId, capacity: usize) -> (MemberKey, OutboundQueue) {
        let (member, queue) = Member::channel(UserId::generate(), room.clone(), capacity);
        let key = member.key();
        index.insert(member);
        (key, queue)
    }

    fn frame(room: &RoomId) -> OutboundFrame {
        let author = User::new("alice".to_string());
        let Ok(frame) = OutboundFrame::encode(&Message::new(room.clone(), &author, "x".into()))
        else {
            panic!("encoding failed");
        };
        frame
    }

    #[test]
    fn room_exists_iff_it_has_members() {
        let mut index = RoomIndex::new();
        let room = RoomId::generate();
        assert!(!index.contains_room(&room));

        let (a, _qa) = join(&mut index, &room, 4);
        let (b, _qb) = join(&mut index, &room, 4);
        assert_eq!(index.member_count(&room), 2);

        assert!(index.remove(&a).is_some());
        assert!(index.contains_room(&room));
        assert!(index.remove(&b).is_some());
        assert!(!index.contains_room(&room));
        assert_eq!(index.room_count(), 0);
    }

    #[test]
    fn second_remove_is_noop() {
        let mut index = RoomIndex::new();
        let room = RoomId::generate();
        let (a, _qa) = join(&mut index, &room, 4);
        assert!(index.remove(&a).is_some());
        assert!(index.remove(&a).is_none());
    }

    #[test]
    fn fan_out_to_unknown_room_is_empty() {
        let mut index = RoomIndex::new();
        let room = RoomId::generate();
        let outcome = index.fan_out(&room, &frame(&room));
        assert_eq!(outcome.delivered, 0);
        assert!(outcome.evicted.is_empty());
    }

    #[test]
    fn fan_out_evicts_full_members_only() {
        let mut index = RoomIndex::new();
        let room = RoomId::generate();
        let (slow, _slow_q) = join(&mut index, &room, 1);
        let (_fast, mut fast_q) = join(&mut index, &room, 8);

        let f = frame(&room);
        let first = index.fan_out(&room, &f);
        assert_eq!(first.delivered, 2);

        let second = index.fan_out(&room, &f);
        assert_eq!(second.delivered, 1);
        assert_eq!(second.evicted.len(), 1);
        let Some(evicted) = second.evicted.first() else {
            panic!("one eviction expected");
        };
        assert_eq!(evicted.member.key(), slow);
        assert_eq!(evicted.reason, EnqueueError::Full);
        assert_eq!(index.member_count(&room), 1);

        assert!(fast_q.try_recv().is_ok());
        assert!(fast_q.try_recv().is_ok());
    }

    #[test]
    fn drain_empties_index() {
        let mut index = RoomIndex::new();
        let (_a, _qa) = join(&mut index, &RoomId::generate(), 4);
        let (_b, _qb) = join(&mut index, &RoomId::generate(), 4);
        assert_eq!(index.connection_count(), 2);
        assert_eq!(index.drain().len(), 2);
        assert_eq!(index.room_count(), 0);
    }
}
