//! Signaling relay and call teardown.
//!
//! Negotiation messages are forwarded by target id alone; the relay does
//! not check that sender and target share a room. A target that has gone
//! away is not an error: the sender learns about it from `call-ended`.

use pairline_protocol::{PeerId, RelayKind, RoomId, ServerEvent};
use pairline_session::ConnectionRegistry;
use serde_json::Value;

use crate::{Matchmaker, Outbound, RoomTable};

/// Forwards an offer, answer, or candidate from `from` to `target`.
///
/// Returns `None` (and emits nothing) when `target` is not connected.
pub(crate) fn forward(
    registry: &ConnectionRegistry,
    kind: RelayKind,
    from: PeerId,
    target: PeerId,
    payload: Value,
) -> Option<Outbound> {
    if !registry.contains(target) {
        tracing::debug!(%from, %target, %kind, "relay target gone, dropping");
        return None;
    }
    tracing::debug!(%from, %target, %kind, "relaying");
    Some(Outbound::new(target, ServerEvent::relayed(kind, from, payload)))
}

/// Ends the call in `room_id`.
///
/// Both members get `call-ended`, the initiator included, so both clients
/// run the same teardown. A room that is already gone is a no-op.
pub(crate) fn end_call(
    registry: &mut ConnectionRegistry,
    rooms: &mut RoomTable,
    room_id: &RoomId,
    initiator: PeerId,
) -> Vec<Outbound> {
    let Some(room) = rooms.remove(room_id) else {
        tracing::debug!(%room_id, %initiator, "end-call for unknown room, ignoring");
        return Vec::new();
    };

    let members = room.members();
    for member in members {
        registry.set_in_call(member, false);
    }

    tracing::info!(%room_id, %initiator, duration = ?room.age(), "call ended");

    members
        .into_iter()
        .map(|member| Outbound::new(member, ServerEvent::CallEnded))
        .collect()
}

/// Tears down everything that refers to `peer_id`, then forgets it.
///
/// Order matters: the queue and the room are cleaned up while the
/// departing peer's record still exists, and the record goes last.
pub(crate) fn disconnect(
    registry: &mut ConnectionRegistry,
    matchmaker: &mut Matchmaker,
    rooms: &mut RoomTable,
    peer_id: PeerId,
) -> Vec<Outbound> {
    let mut out = Vec::new();

    matchmaker.cancel_wait(peer_id);

    if let Some(room) = rooms.remove_by_member(peer_id) {
        match room.other(peer_id) {
            Some(peer) if registry.contains(peer) => {
                registry.set_in_call(peer, false);
                out.push(Outbound::new(peer, ServerEvent::CallEnded));
            }
            _ => {}
        }
        tracing::info!(
            room_id = %room.room_id,
            %peer_id,
            duration = ?room.age(),
            "call ended by disconnect"
        );
    }

    match registry.unregister(peer_id) {
        Some(conn) => {
            tracing::info!(%peer_id, connected_for = ?conn.age(), "peer disconnected");
        }
        None => {
            tracing::debug!(%peer_id, "disconnect for unknown peer");
        }
    }

    out
}
