//! Per-recipient delivery filter.
//!
//! The hub delivers every broadcast to every member of a room, sender
//! included. Whether a recipient should actually see a given message is
//! decided here, at delivery time, one recipient at a time.

use super::UserId;

/// Decides which delivered messages a single recipient is interested in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestFilter {
    /// The receiving user.
    viewer: UserId,
    /// Whether the viewer's own messages are filtered out.
    suppress_echo: bool,
}

impl InterestFilter {
    /// Creates a filter that lets everything through.
    #[must_use]
    pub fn new(viewer: UserId) -> Self {
        Self {
            viewer,
            suppress_echo: false,
        }
    }

    /// Creates a filter that hides messages written by `viewer`.
    #[must_use]
    pub fn suppressing_echo(viewer: UserId) -> Self {
        Self {
            viewer,
            suppress_echo: true,
        }
    }

    /// Returns `true` if a message written by `author` should be shown.
    #[must_use]
    pub fn accepts(&self, author: &UserId) -> bool {
        !(self.suppress_echo && *author == self.viewer)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_own_messages() {
        let me = UserId::generate();
        let filter = InterestFilter::new(me.clone());
        assert!(filter.accepts(&me));
        assert!(filter.accepts(&UserId::generate()));
    }

    #[test]
    fn echo_suppression_hides_only_own_messages() {
        let me = UserId::generate();
        let filter = InterestFilter::suppressing_echo(me.clone());
        assert!(!filter.accepts(&me));
        assert!(filter.accepts(&UserId::generate()));
    }
}
