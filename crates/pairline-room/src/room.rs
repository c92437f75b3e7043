//! Active call rooms.
//!
//! A room is nothing but the pairing of two peers under a fresh id. The
//! table keeps a reverse index from peer to room so "which call is this
//! peer in" is a lookup rather than a scan, and so the one-room-per-peer
//! invariant can be checked on every insert.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use pairline_protocol::{PeerId, RoomId};
use rand::Rng;

/// Characters used for the random part of a room id.
const ROOM_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part of a room id.
const ROOM_ID_SUFFIX_LEN: usize = 9;

/// One active call between two distinct peers.
#[derive(Debug, Clone)]
pub struct Room {
    /// The room's id, as handed to both peers in `matched`.
    pub room_id: RoomId,
    /// The older of the two waiting peers.
    pub user1: PeerId,
    /// The younger of the two waiting peers.
    pub user2: PeerId,
    /// When the pairing happened.
    pub created_at: Instant,
}

impl Room {
    /// Both members, `user1` first.
    pub fn members(&self) -> [PeerId; 2] {
        [self.user1, self.user2]
    }

    /// Returns `true` if `peer_id` is one of the two members.
    pub fn contains(&self, peer_id: PeerId) -> bool {
        self.user1 == peer_id || self.user2 == peer_id
    }

    /// The member that is not `peer_id`, or `None` if `peer_id` is not a
    /// member at all.
    pub fn other(&self, peer_id: PeerId) -> Option<PeerId> {
        if peer_id == self.user1 {
            Some(self.user2)
        } else if peer_id == self.user2 {
            Some(self.user1)
        } else {
            None
        }
    }

    /// How long the call has been up.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// All active rooms, indexed by id and by member.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomId, Room>,

    /// Maps each peer to the room it is in. A peer appears at most once.
    members: HashMap<PeerId, RoomId>,
}

impl RoomTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room for two peers and returns its fresh id.
    ///
    /// Callers must only pair peers that are in no other room.
    pub fn create(&mut self, user1: PeerId, user2: PeerId) -> RoomId {
        debug_assert_ne!(user1, user2, "a peer cannot be paired with itself");
        debug_assert!(
            !self.members.contains_key(&user1) && !self.members.contains_key(&user2),
            "peer is already a member of another room"
        );

        let room_id = loop {
            let candidate = generate_room_id();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        self.members.insert(user1, room_id.clone());
        self.members.insert(user2, room_id.clone());
        self.rooms.insert(
            room_id.clone(),
            Room {
                room_id: room_id.clone(),
                user1,
                user2,
                created_at: Instant::now(),
            },
        );
        room_id
    }

    /// Looks up a room by id.
    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// The room `peer_id` is in, if any.
    pub fn room_of(&self, peer_id: PeerId) -> Option<&Room> {
        self.members
            .get(&peer_id)
            .and_then(|room_id| self.rooms.get(room_id))
    }

    /// Deletes a room and releases both members. `None` if already gone.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for member in room.members() {
            self.members.remove(&member);
        }
        Some(room)
    }

    /// Deletes whichever room `peer_id` is in.
    pub fn remove_by_member(&mut self, peer_id: PeerId) -> Option<Room> {
        let room_id = self.members.get(&peer_id)?.clone();
        self.remove(&room_id)
    }

    /// Number of active rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no call is active.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Builds an id of the form `room_<unix-millis>_<9 base-36 chars>`.
fn generate_room_id() -> RoomId {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    let mut rng = rand::rng();
    let suffix: String = (0..ROOM_ID_SUFFIX_LEN)
        .map(|_| ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())] as char)
        .collect();

    RoomId::new(format!("room_{millis}_{suffix}"))
}
