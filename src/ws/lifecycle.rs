//! Per-connection state machine.
//!
//! `Connecting → Registered → Active → Closing → Closed`. Either connection
//! path may start closing, possibly at the same time; only the first caller
//! wins, and `Closed` is reached exactly once.

use std::sync::atomic::{AtomicU8, Ordering};

/// Observable connection states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ConnectionState {
    /// Upgrade accepted, not yet known to the hub.
    Connecting = 0,
    /// Registration submitted to the hub.
    Registered = 1,
    /// Both paths running.
    Active = 2,
    /// Teardown started.
    Closing = 3,
    /// Teardown finished.
    Closed = 4,
}

impl ConnectionState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Connecting,
            1 => Self::Registered,
            2 => Self::Active,
            3 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Lock-free holder of a [`ConnectionState`], shared by both paths.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Starts in [`ConnectionState::Connecting`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Connecting as u8),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `Connecting → Registered`. Returns `false` if not in `Connecting`.
    pub fn mark_registered(&self) -> bool {
        self.transition(ConnectionState::Connecting, ConnectionState::Registered)
    }

    /// `Registered → Active`. Returns `false` if not in `Registered`.
    pub fn mark_active(&self) -> bool {
        self.transition(ConnectionState::Registered, ConnectionState::Active)
    }

    /// Enters `Closing` from any earlier state.
    ///
    /// Returns `true` only for the caller that performed the transition.
    pub fn begin_closing(&self) -> bool {
        let closing = ConnectionState::Closing as u8;
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < closing).then_some(closing)
            })
            .is_ok()
    }

    /// `Closing → Closed`. Returns `true` only once.
    pub fn mark_closed(&self) -> bool {
        self.transition(ConnectionState::Closing, ConnectionState::Closed)
    }

    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
