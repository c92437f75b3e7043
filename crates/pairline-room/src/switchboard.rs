//! The switchboard: one state container, one dispatch function.
//!
//! The registry, the waiting queue, and the room table are only ever
//! touched through [`Switchboard::handle`], and the server keeps the whole
//! switchboard behind a single lock. That makes a pairing pass or a
//! disconnect teardown atomic with respect to every other event.

use pairline_protocol::{ClientEvent, PeerId, RelayKind, ServerEvent};
use pairline_session::ConnectionRegistry;

use crate::{Matchmaker, Outbound, RoomTable, relay};

/// Everything that can happen to a connection, as seen by the switchboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The transport accepted the connection.
    Connect,
    /// The client sent an event.
    Client(ClientEvent),
    /// The transport lost the connection.
    Disconnect,
}

impl From<ClientEvent> for Inbound {
    fn from(event: ClientEvent) -> Self {
        Self::Client(event)
    }
}

/// Point-in-time counts, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Live connections.
    pub connections: usize,
    /// Peers waiting for a match.
    pub waiting: usize,
    /// Active calls.
    pub rooms: usize,
}

/// Matchmaking and relay state for the whole process.
#[derive(Debug, Default)]
pub struct Switchboard {
    registry: ConnectionRegistry,
    matchmaker: Matchmaker,
    rooms: RoomTable,
}

impl Switchboard {
    /// Creates an empty switchboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event from `peer_id` and returns what must be sent, in
    /// order.
    pub fn handle(&mut self, peer_id: PeerId, event: Inbound) -> Vec<Outbound> {
        match event {
            Inbound::Connect => {
                self.registry.register(peer_id);
                Vec::new()
            }
            Inbound::Client(event) => self.handle_client(peer_id, event),
            Inbound::Disconnect => relay::disconnect(
                &mut self.registry,
                &mut self.matchmaker,
                &mut self.rooms,
                peer_id,
            ),
        }
    }

    fn handle_client(&mut self, peer_id: PeerId, event: ClientEvent) -> Vec<Outbound> {
        match event {
            ClientEvent::FindRandomMatch => {
                self.matchmaker
                    .request_match(peer_id, &mut self.registry, &mut self.rooms)
            }
            ClientEvent::CancelMatch => {
                self.matchmaker.cancel_wait(peer_id);
                Vec::new()
            }
            ClientEvent::SendOffer { target, offer } => {
                self.forward(RelayKind::Offer, peer_id, target, offer)
            }
            ClientEvent::SendAnswer { target, answer } => {
                self.forward(RelayKind::Answer, peer_id, target, answer)
            }
            ClientEvent::SendIceCandidate { target, candidate } => {
                self.forward(RelayKind::IceCandidate, peer_id, target, candidate)
            }
            ClientEvent::EndCall { room_id } => {
                relay::end_call(&mut self.registry, &mut self.rooms, &room_id, peer_id)
            }
            ClientEvent::Heartbeat { client_time } => {
                vec![Outbound::new(peer_id, ServerEvent::HeartbeatAck { client_time })]
            }
        }
    }

    fn forward(
        &self,
        kind: RelayKind,
        from: PeerId,
        target: PeerId,
        payload: serde_json::Value,
    ) -> Vec<Outbound> {
        relay::forward(&self.registry, kind, from, target, payload)
            .into_iter()
            .collect()
    }

    /// The connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// The matchmaker and its queue.
    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    /// The active rooms.
    pub fn rooms(&self) -> &RoomTable {
        &self.rooms
    }

    /// Current counts.
    pub fn stats(&self) -> Stats {
        Stats {
            connections: self.registry.len(),
            waiting: self.matchmaker.waiting_len(),
            rooms: self.rooms.len(),
        }
    }
}
