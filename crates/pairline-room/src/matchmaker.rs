//! FIFO matchmaking.
//!
//! The policy is deliberately the simplest fair one: the two peers that
//! have waited longest are paired together. A waiting peer is matched as
//! soon as one more peer arrives, so nobody starves.

use std::collections::VecDeque;

use pairline_protocol::{PeerId, ServerEvent};
use pairline_session::ConnectionRegistry;

use crate::{Outbound, RoomTable};

/// Owns the waiting queue and runs the pairing pass.
#[derive(Debug, Default)]
pub struct Matchmaker {
    /// Waiting peers, oldest first. A peer appears at most once.
    queue: VecDeque<PeerId>,
}

impl Matchmaker {
    /// Creates a matchmaker with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `peer_id` for a match and pairs whoever can be paired.
    ///
    /// Ignored if the peer is unknown, already in a call, or already
    /// queued. Returns the `matched` events produced by the pairing pass.
    pub fn request_match(
        &mut self,
        peer_id: PeerId,
        registry: &mut ConnectionRegistry,
        rooms: &mut RoomTable,
    ) -> Vec<Outbound> {
        match registry.get(peer_id) {
            None => {
                tracing::debug!(%peer_id, "match request from unknown peer, ignoring");
                return Vec::new();
            }
            Some(conn) if conn.in_call => {
                tracing::debug!(%peer_id, "peer already in a call, ignoring match request");
                return Vec::new();
            }
            Some(_) => {}
        }

        if self.is_waiting(peer_id) {
            tracing::debug!(%peer_id, "peer already waiting, ignoring match request");
            return Vec::new();
        }

        self.queue.push_back(peer_id);
        tracing::info!(%peer_id, waiting = self.queue.len(), "peer looking for a match");

        self.pair_waiting(registry, rooms)
    }

    /// Removes `peer_id` from the queue. Returns `true` if it was queued.
    pub fn cancel_wait(&mut self, peer_id: PeerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&waiting| waiting != peer_id);
        let removed = self.queue.len() != before;
        if removed {
            tracing::debug!(%peer_id, "peer left the waiting queue");
        }
        removed
    }

    /// Returns `true` if `peer_id` is queued.
    pub fn is_waiting(&self, peer_id: PeerId) -> bool {
        self.queue.contains(&peer_id)
    }

    /// Waiting peers, oldest first.
    pub fn waiting(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.queue.iter().copied()
    }

    /// Number of waiting peers.
    pub fn waiting_len(&self) -> usize {
        self.queue.len()
    }

    /// The pairing pass. The only place rooms are created.
    ///
    /// Pops the two oldest entries until fewer than two remain. A pair
    /// where either peer has since disconnected is dropped as a whole; a
    /// live peer caught in such a pair has to ask again.
    fn pair_waiting(
        &mut self,
        registry: &mut ConnectionRegistry,
        rooms: &mut RoomTable,
    ) -> Vec<Outbound> {
        let mut out = Vec::new();

        while self.queue.len() >= 2 {
            let (Some(user1), Some(user2)) = (self.queue.pop_front(), self.queue.pop_front())
            else {
                break;
            };

            if !registry.contains(user1) || !registry.contains(user2) {
                tracing::debug!(%user1, %user2, "dropping pair with a vanished peer");
                continue;
            }

            let room_id = rooms.create(user1, user2);
            registry.set_in_call(user1, true);
            registry.set_in_call(user2, true);

            tracing::info!(%room_id, %user1, %user2, "peers matched");

            out.push(Outbound::new(
                user1,
                ServerEvent::Matched {
                    room_id: room_id.clone(),
                    peer: user2,
                },
            ));
            out.push(Outbound::new(
                user2,
                ServerEvent::Matched {
                    room_id,
                    peer: user1,
                },
            ));
        }

        out
    }
}
