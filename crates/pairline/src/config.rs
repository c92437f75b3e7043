//! Server configuration.

use std::time::Duration;

/// Settings for a [`PairlineServer`](crate::PairlineServer).
///
/// Start from `ServerConfig::default()` and override what you need, or use
/// the setters on [`PairlineServerBuilder`](crate::PairlineServerBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on. Default: `127.0.0.1:8080`.
    pub bind_addr: String,

    /// Close a connection that sends nothing for this long.
    ///
    /// Default: `None`, connections stay open until the client leaves.
    /// Clients that enable this should send `heartbeat` events.
    pub idle_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            idle_timeout: None,
        }
    }
}
