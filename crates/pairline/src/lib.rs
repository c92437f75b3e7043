//! # Pairline
//!
//! Signaling relay for anonymous, randomly paired one-to-one voice calls.
//!
//! Pairline never carries audio. Clients connect over WebSocket, ask for a
//! random partner, and once paired exchange session descriptions and ICE
//! candidates through the relay until their peer-to-peer media path is up.
//! The relay's job is the waiting queue, the pairing, the forwarding, and
//! clean teardown when a call ends or a peer drops.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pairline::prelude::*;
//!
//! # async fn start() -> Result<(), PairlineError> {
//! let server = PairlineServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod hub;
mod server;

pub use config::ServerConfig;
pub use error::PairlineError;
pub use server::{Monitor, PairlineServer, PairlineServerBuilder};

pub use pairline_protocol as protocol;
pub use pairline_room as room;
pub use pairline_session as session;
pub use pairline_transport as transport;

/// Everything needed to run a server and speak its protocol.
pub mod prelude {
    pub use crate::{Monitor, PairlineError, PairlineServer, PairlineServerBuilder, ServerConfig};
    pub use pairline_protocol::{ClientEvent, Codec, JsonCodec, PeerId, RoomId, ServerEvent};
    pub use pairline_room::Stats;
}
