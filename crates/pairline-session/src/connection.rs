//! The per-connection record.

use std::time::{Duration, Instant};

use pairline_protocol::PeerId;

/// The registry's record of one live connection.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Which peer this record belongs to.
    pub peer_id: PeerId,

    /// `true` while the peer is a member of an active room.
    ///
    /// Owned by the registry but flipped by the matchmaker (on pairing) and
    /// the relay (on teardown). All flips happen while a single inbound
    /// event is being handled, under the switchboard lock.
    pub in_call: bool,

    /// When the transport reported the connection.
    pub connected_at: Instant,
}

impl Connection {
    /// A freshly connected, idle peer.
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            peer_id,
            in_call: false,
            connected_at: Instant::now(),
        }
    }

    /// How long this connection has been registered.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
