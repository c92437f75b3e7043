//! `PairlineServer` builder and accept loop.
//!
//! Ties the layers together: WebSocket transport → JSON events → hub
//! (switchboard + mailboxes).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pairline_protocol::{Codec, JsonCodec};
use pairline_room::Stats;
use pairline_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::hub::Hub;
use crate::{PairlineError, ServerConfig};

/// Shared server state passed to each connection task.
///
/// The hub is the single serialization point for all matchmaking and
/// relay state.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) hub: Mutex<Hub>,
    pub(crate) codec: C,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a Pairline server.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use pairline::prelude::*;
///
/// # async fn start() -> Result<(), PairlineError> {
/// let server = PairlineServer::builder()
///     .bind("0.0.0.0:8080")
///     .idle_timeout(Duration::from_secs(60))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PairlineServerBuilder {
    config: ServerConfig,
}

impl PairlineServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Closes connections that stay silent for `timeout`.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = Some(timeout);
        self
    }

    /// Binds the listener using the JSON codec.
    pub async fn build(self) -> Result<PairlineServer<JsonCodec>, PairlineError> {
        self.build_with_codec(JsonCodec).await
    }

    /// Binds the listener using a custom codec.
    pub async fn build_with_codec<C: Codec>(
        self,
        codec: C,
    ) -> Result<PairlineServer<C>, PairlineError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let state = Arc::new(ServerState {
            hub: Mutex::new(Hub::new()),
            codec,
            config: self.config,
        });

        Ok(PairlineServer { transport, state })
    }
}

/// A bound Pairline server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct PairlineServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl PairlineServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> PairlineServerBuilder {
        PairlineServerBuilder::new()
    }
}

impl<C: Codec> PairlineServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, PairlineError> {
        Ok(self.transport.local_addr()?)
    }

    /// Returns a handle for reading live counts while the server runs.
    pub fn monitor(&self) -> Monitor<C> {
        Monitor {
            state: Arc::clone(&self.state),
        }
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted connection is handled on its own task.
    pub async fn run(mut self) -> Result<(), PairlineError> {
        tracing::info!(
            addr = %self.state.config.bind_addr,
            idle_timeout = ?self.state.config.idle_timeout,
            "Pairline relay running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Read-only view of a running server's state.
pub struct Monitor<C: Codec> {
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Clone for Monitor<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: Codec> Monitor<C> {
    /// Current connection, queue, and room counts.
    pub async fn stats(&self) -> Stats {
        self.state.hub.lock().await.stats()
    }
}
