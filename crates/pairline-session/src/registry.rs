//! The connection registry: every live connection and its call flag.
//!
//! # Concurrency note
//!
//! `ConnectionRegistry` is a plain `HashMap` with no locking of its own.
//! It lives inside the switchboard, and the switchboard sits behind one
//! lock together with the waiting queue and the room table, so a pairing
//! pass or a disconnect teardown sees all three consistently.
//!
//! Every operation tolerates ids that are not present. A peer can vanish
//! between the moment an event naming it is read and the moment it is
//! handled; that is normal, not an error.

use std::collections::HashMap;

use pairline_protocol::PeerId;

use crate::Connection;

/// Tracks all live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<PeerId, Connection>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new connection as idle.
    ///
    /// The transport never reuses ids, but if one shows up twice the old
    /// record is overwritten rather than treated as a failure.
    pub fn register(&mut self, peer_id: PeerId) {
        if self
            .connections
            .insert(peer_id, Connection::new(peer_id))
            .is_some()
        {
            tracing::warn!(%peer_id, "duplicate registration, record replaced");
        } else {
            tracing::debug!(%peer_id, "connection registered");
        }
    }

    /// Removes a connection. No-op if absent.
    pub fn unregister(&mut self, peer_id: PeerId) -> Option<Connection> {
        let removed = self.connections.remove(&peer_id);
        if removed.is_some() {
            tracing::debug!(%peer_id, "connection unregistered");
        }
        removed
    }

    /// Looks up a connection. `None` means the peer is gone.
    pub fn get(&self, peer_id: PeerId) -> Option<&Connection> {
        self.connections.get(&peer_id)
    }

    /// Returns `true` if the peer is still connected.
    pub fn contains(&self, peer_id: PeerId) -> bool {
        self.connections.contains_key(&peer_id)
    }

    /// Returns `true` if the peer is connected and in a call.
    pub fn is_in_call(&self, peer_id: PeerId) -> bool {
        self.get(peer_id).is_some_and(|c| c.in_call)
    }

    /// Sets the in-call flag. No-op if the peer is gone.
    pub fn set_in_call(&mut self, peer_id: PeerId, in_call: bool) {
        if let Some(conn) = self.connections.get_mut(&peer_id) {
            conn.in_call = in_call;
        }
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PeerId {
        PeerId(id)
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_new_peer_is_idle() {
        let mut reg = ConnectionRegistry::new();

        reg.register(pid(1));

        let conn = reg.get(pid(1)).expect("should be registered");
        assert_eq!(conn.peer_id, pid(1));
        assert!(!conn.in_call);
    }

    #[test]
    fn test_register_duplicate_overwrites_without_panic() {
        let mut reg = ConnectionRegistry::new();
        reg.register(pid(1));
        reg.set_in_call(pid(1), true);

        reg.register(pid(1));

        assert_eq!(reg.len(), 1);
        assert!(!reg.is_in_call(pid(1)), "overwrite resets to idle");
    }

    // =====================================================================
    // unregister()
    // =====================================================================

    #[test]
    fn test_unregister_removes_record() {
        let mut reg = ConnectionRegistry::new();
        reg.register(pid(1));

        let removed = reg.unregister(pid(1));

        assert!(removed.is_some());
        assert!(reg.get(pid(1)).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let mut reg = ConnectionRegistry::new();
        reg.register(pid(1));

        assert!(reg.unregister(pid(99)).is_none());
        assert_eq!(reg.len(), 1);
    }

    // =====================================================================
    // set_in_call() / is_in_call()
    // =====================================================================

    #[test]
    fn test_set_in_call_flips_flag_both_ways() {
        let mut reg = ConnectionRegistry::new();
        reg.register(pid(1));

        reg.set_in_call(pid(1), true);
        assert!(reg.is_in_call(pid(1)));

        reg.set_in_call(pid(1), false);
        assert!(!reg.is_in_call(pid(1)));
    }

    #[test]
    fn test_set_in_call_absent_is_noop() {
        let mut reg = ConnectionRegistry::new();

        reg.set_in_call(pid(5), true);

        assert!(reg.get(pid(5)).is_none(), "must not create a record");
        assert!(!reg.is_in_call(pid(5)));
    }

    #[test]
    fn test_len_tracks_connection_count() {
        let mut reg = ConnectionRegistry::new();
        assert!(reg.is_empty());

        reg.register(pid(1));
        reg.register(pid(2));
        assert_eq!(reg.len(), 2);
        assert!(reg.contains(pid(2)));

        reg.unregister(pid(1));
        assert_eq!(reg.len(), 1);
        assert!(!reg.contains(pid(1)));
    }
}
