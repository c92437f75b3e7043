//! Unified error type for the Pairline server.

use std::time::Duration;

use pairline_protocol::ProtocolError;
use pairline_transport::TransportError;

/// Top-level error wrapping the per-crate errors.
///
/// The switchboard itself cannot fail (stale ids are no-ops), so only
/// the layers that touch bytes and sockets show up here.
#[derive(Debug, thiserror::Error)]
pub enum PairlineError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The connection sent nothing for longer than the configured limit.
    #[error("connection idle for {0:?}")]
    IdleTimeout(Duration),
}
