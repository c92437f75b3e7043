//! The hub: the switchboard plus one outbound mailbox per connection.
//!
//! Both live behind the same lock. Outbound events are pushed into the
//! recipients' mailboxes before the lock is released, so a peer always
//! sees events in the order the switchboard produced them (a `matched`
//! can never be overtaken by an offer relayed from the new partner).
//! Pushing into an unbounded channel never waits; the socket writes happen
//! later in each connection's writer task.

use std::collections::HashMap;

use pairline_protocol::{PeerId, ServerEvent};
use pairline_room::{Inbound, Outbound, Stats, Switchboard};
use tokio::sync::mpsc;

/// Sending half of a connection's outbound queue.
pub(crate) type Mailbox = mpsc::UnboundedSender<ServerEvent>;

#[derive(Default)]
pub(crate) struct Hub {
    switchboard: Switchboard,
    mailboxes: HashMap<PeerId, Mailbox>,
}

impl Hub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and the queue its writer drains.
    pub(crate) fn connect(&mut self, peer_id: PeerId, mailbox: Mailbox) {
        self.mailboxes.insert(peer_id, mailbox);
        self.dispatch(peer_id, Inbound::Connect);
    }

    /// Runs one event through the switchboard and queues the results.
    pub(crate) fn dispatch(&mut self, peer_id: PeerId, event: Inbound) {
        let out = self.switchboard.handle(peer_id, event);
        self.deliver(out);
    }

    /// Tears the connection down and drops its mailbox, which ends the
    /// writer task once it has flushed what is already queued.
    pub(crate) fn disconnect(&mut self, peer_id: PeerId) {
        self.dispatch(peer_id, Inbound::Disconnect);
        self.mailboxes.remove(&peer_id);

        let stats = self.switchboard.stats();
        tracing::debug!(
            connections = stats.connections,
            waiting = stats.waiting,
            rooms = stats.rooms,
            "relay state after disconnect"
        );
    }

    /// Queues a single event for one peer. Dropped if the peer is gone.
    pub(crate) fn send_to(&self, peer_id: PeerId, event: ServerEvent) {
        match self.mailboxes.get(&peer_id) {
            Some(mailbox) => {
                if mailbox.send(event).is_err() {
                    tracing::debug!(%peer_id, "writer already stopped, event dropped");
                }
            }
            None => {
                tracing::debug!(%peer_id, event = event.name(), "no mailbox, event dropped");
            }
        }
    }

    pub(crate) fn stats(&self) -> Stats {
        self.switchboard.stats()
    }

    fn deliver(&self, out: Vec<Outbound>) {
        for Outbound { to, event } in out {
            self.send_to(to, event);
        }
    }
}
