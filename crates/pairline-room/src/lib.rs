//! Matchmaking, call rooms, and signaling relay for Pairline.
//!
//! Everything that decides who talks to whom lives here, and all of it is
//! plain synchronous state. The [`Switchboard`] owns the three tables the
//! relay needs and processes one inbound event at a time:
//!
//! - [`ConnectionRegistry`](pairline_session::ConnectionRegistry) — who is
//!   connected, and whether they are in a call
//! - [`Matchmaker`] — the FIFO waiting queue and the pairing pass
//! - [`RoomTable`] — active calls, at most one per peer
//!
//! Each call to [`Switchboard::handle`] returns the [`Outbound`] events the
//! caller must deliver. No I/O happens inside, so the whole state machine
//! can be driven from tests without a network.
//!
//! # Per-peer lifecycle
//!
//! ```text
//! Idle ──find-random-match──→ Waiting ──pairing pass──→ InCall
//!  ↑                            │                         │
//!  └──────cancel-match──────────┘                         │
//!  └──────────end-call / peer disconnect──────────────────┘
//! ```

mod matchmaker;
mod outbound;
mod relay;
mod room;
mod switchboard;

pub use matchmaker::Matchmaker;
pub use outbound::Outbound;
pub use room::{Room, RoomTable};
pub use switchboard::{Inbound, Stats, Switchboard};
