//! Wire protocol for Pairline.
//!
//! This crate defines what clients and the relay say to each other:
//!
//! - **Identifiers** ([`PeerId`], [`RoomId`]) — who is talking and which
//!   call they are in.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the closed set of
//!   messages in each direction.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events become
//!   frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! Session descriptions and ICE candidates are carried as opaque JSON
//! values. The relay never looks inside them.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Switchboard (state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{ClientEvent, PeerId, RelayKind, RoomId, ServerEvent};
