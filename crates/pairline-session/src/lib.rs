//! Connection registry for Pairline.
//!
//! Every live connection has exactly one [`Connection`] record here, from
//! transport-level connect until disconnect. The record carries the one
//! piece of call state the rest of the relay shares: whether the peer is
//! currently in a call.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room layer (above)  ← matchmaker and relay read/flip `in_call`
//!     ↕
//! Session layer (this crate)  ← who is connected right now
//!     ↕
//! Protocol layer (below)  ← provides PeerId
//! ```

mod connection;
mod registry;

pub use connection::Connection;
pub use registry::ConnectionRegistry;
