//! Connection/room broadcast hub.
//!
//! The hub tracks which live connections belong to which room and fans room
//! broadcasts out to them. Producers never wait on consumers: each member has
//! a bounded outbound queue, frames are offered with a non-blocking enqueue,
//! and a member whose queue is full is evicted after the pass.
//!
//! ```text
//! MessageService ──broadcast──▶ Hub (control task) ──try_enqueue──▶ Member queue ──▶ writer path
//! connection     ──register / unregister──▶ Hub
//! ```

pub mod dispatcher;
pub mod frame;
pub mod member;
pub mod room_index;

pub use dispatcher::{Hub, HubSnapshot};
pub use frame::OutboundFrame;
pub use member::{ConnectionId, EnqueueError, Member, MemberKey, OutboundQueue};
pub use room_index::RoomIndex;
