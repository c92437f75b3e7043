//! Per-connection handler: register, read events, tear down.
//!
//! Each accepted connection gets two Tokio tasks:
//!   1. The handler (this function): registers the peer, then loops
//!      reading frames, decoding them, and dispatching into the hub.
//!   2. The writer: drains the peer's mailbox and writes each event to
//!      the socket, so a slow client never holds the hub lock.

use std::sync::Arc;
use std::time::Duration;

use pairline_protocol::{ClientEvent, Codec, PeerId, ServerEvent};
use pairline_room::Inbound;
use pairline_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::PairlineError;
use crate::server::ServerState;

/// Drop guard that runs disconnect teardown when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct ConnectionGuard<C: Codec> {
    peer_id: PeerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        let peer_id = self.peer_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.hub.lock().await.disconnect(peer_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), PairlineError> {
    let peer_id = PeerId::from(conn.id());
    let conn = Arc::new(conn);

    let (mailbox, outbox) = mpsc::unbounded_channel();
    state.hub.lock().await.connect(peer_id, mailbox);
    let _guard = ConnectionGuard {
        peer_id,
        state: Arc::clone(&state),
    };
    tracing::info!(%peer_id, "peer connected");

    tokio::spawn(write_outbound(
        Arc::clone(&conn),
        outbox,
        Arc::clone(&state),
    ));

    loop {
        let data = match next_frame(&conn, state.config.idle_timeout).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%peer_id, "connection closed cleanly");
                break;
            }
            Err(PairlineError::IdleTimeout(limit)) => {
                tracing::info!(%peer_id, ?limit, "connection idle, closing");
                break;
            }
            Err(e) => {
                tracing::debug!(%peer_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%peer_id, error = %e, "rejecting malformed event");
                state.hub.lock().await.send_to(
                    peer_id,
                    ServerEvent::Error {
                        code: 400,
                        message: e.to_string(),
                    },
                );
                continue;
            }
        };

        state.hub.lock().await.dispatch(peer_id, Inbound::Client(event));
    }

    // _guard drops here → disconnect teardown fires.
    Ok(())
}

/// Reads the next frame, giving up after `idle_timeout` if one is set.
async fn next_frame(
    conn: &WebSocketConnection,
    idle_timeout: Option<Duration>,
) -> Result<Option<Vec<u8>>, PairlineError> {
    match idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, conn.recv()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(PairlineError::IdleTimeout(limit)),
        },
        None => Ok(conn.recv().await?),
    }
}

/// Writes queued events to the socket until the mailbox is dropped or a
/// write fails, then closes the connection.
async fn write_outbound<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut outbox: mpsc::UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<C>>,
) {
    let peer_id = PeerId::from(conn.id());

    while let Some(event) = outbox.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%peer_id, event = event.name(), error = %e, "encode failed");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%peer_id, error = %e, "send failed, stopping writer");
            break;
        }
    }

    if let Err(e) = conn.close().await {
        tracing::debug!(%peer_id, error = %e, "close failed");
    }
}
