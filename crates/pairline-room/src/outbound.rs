use pairline_protocol::{PeerId, ServerEvent};

/// An event the switchboard wants delivered to one peer.
///
/// Delivery is the caller's job. A peer that has already gone away is
/// simply skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// The peer to deliver to.
    pub to: PeerId,
    /// What to deliver.
    pub event: ServerEvent,
}

impl Outbound {
    /// Addresses `event` to `to`.
    pub fn new(to: PeerId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}
