//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an outbound event failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// An inbound frame could not be parsed into an event.
    ///
    /// Common causes: malformed JSON, an unknown `event` tag, or a
    /// missing required field such as `target`.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
