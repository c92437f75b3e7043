//! Signaling event types for Pairline's wire format.
//!
//! Every frame is one JSON object naming its event in an `event` field and
//! carrying the body, if any, under `data`:
//!
//! ```text
//! { "event": "send-offer", "data": { "target": 7, "offer": { ... } } }
//! { "event": "call-ended" }
//! ```
//!
//! Event names are kebab-case and body fields camelCase, which is what
//! browser clients expect.

use std::fmt;

use pairline_transport::ConnectionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identity of a connected user as seen by other users.
///
/// Peers are anonymous: the id is nothing more than the transport's
/// connection id, handed to the other party in `matched` so it can address
/// relay events. Serializes as a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PeerId(pub u64);

impl From<ConnectionId> for PeerId {
    fn from(id: ConnectionId) -> Self {
        Self(id.into_inner())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Identifier of one active call.
///
/// Only uniqueness among active rooms matters; the string carries no
/// ordering. Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an existing room id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Relay kinds
// ---------------------------------------------------------------------------

/// The three negotiation messages the relay forwards between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayKind {
    /// A session description offer.
    Offer,
    /// A session description answer.
    Answer,
    /// A network-path candidate.
    IceCandidate,
}

impl RelayKind {
    /// Short name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Client → relay
// ---------------------------------------------------------------------------

/// Events a client may send to the relay.
///
/// Connect and disconnect are not here: they come from the transport, not
/// from frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// "Pair me with someone."
    FindRandomMatch,

    /// "Stop looking for a partner." Ignored unless queued.
    CancelMatch,

    /// Forward a session description offer to `target`.
    SendOffer { target: PeerId, offer: Value },

    /// Forward a session description answer to `target`.
    SendAnswer { target: PeerId, answer: Value },

    /// Forward a network-path candidate to `target`.
    SendIceCandidate { target: PeerId, candidate: Value },

    /// Hang up the call in `room_id`.
    EndCall { room_id: RoomId },

    /// Keep-alive. Answered with [`ServerEvent::HeartbeatAck`].
    Heartbeat { client_time: u64 },
}

impl ClientEvent {
    /// Builds the relay event for `kind`.
    pub fn relay(kind: RelayKind, target: PeerId, payload: Value) -> Self {
        match kind {
            RelayKind::Offer => Self::SendOffer { target, offer: payload },
            RelayKind::Answer => Self::SendAnswer { target, answer: payload },
            RelayKind::IceCandidate => Self::SendIceCandidate {
                target,
                candidate: payload,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Relay → client
// ---------------------------------------------------------------------------

/// Events the relay sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// "You are in a call with `peer`."
    Matched { room_id: RoomId, peer: PeerId },

    /// An offer relayed from `from`.
    ReceiveOffer { from: PeerId, offer: Value },

    /// An answer relayed from `from`.
    ReceiveAnswer { from: PeerId, answer: Value },

    /// A candidate relayed from `from`.
    ReceiveIceCandidate { from: PeerId, candidate: Value },

    /// The call is over. Sent to both parties of an `end-call` and to the
    /// survivor of a disconnect.
    CallEnded,

    /// Echo of a client heartbeat.
    HeartbeatAck { client_time: u64 },

    /// The last frame was rejected. `code` follows HTTP conventions.
    Error { code: u16, message: String },
}

impl ServerEvent {
    /// Builds the `receive-*` event for a relayed payload.
    pub fn relayed(kind: RelayKind, from: PeerId, payload: Value) -> Self {
        match kind {
            RelayKind::Offer => Self::ReceiveOffer { from, offer: payload },
            RelayKind::Answer => Self::ReceiveAnswer { from, answer: payload },
            RelayKind::IceCandidate => Self::ReceiveIceCandidate {
                from,
                candidate: payload,
            },
        }
    }

    /// The wire name of this event, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matched { .. } => "matched",
            Self::ReceiveOffer { .. } => "receive-offer",
            Self::ReceiveAnswer { .. } => "receive-answer",
            Self::ReceiveIceCandidate { .. } => "receive-ice-candidate",
            Self::CallEnded => "call-ended",
            Self::HeartbeatAck { .. } => "heartbeat-ack",
            Self::Error { .. } => "error",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
