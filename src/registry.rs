//! Connection identity tables
//!
//! `ConnectionRegistry` maps a connection to the username it joined with;
//! `MembershipIndex` maps a username to the single room it last joined.

use std::collections::HashMap;

use crate::types::{ClientId, RoomId};

/// ClientId -> username
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    names: HashMap<ClientId, String>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the username for a connection, replacing any earlier one
    pub fn register(&mut self, client_id: ClientId, username: String) {
        self.names.insert(client_id, username);
    }

    pub fn username(&self, client_id: ClientId) -> Option<&str> {
        self.names.get(&client_id).map(String::as_str)
    }

    pub fn remove(&mut self, client_id: ClientId) -> Option<String> {
        self.names.remove(&client_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// username -> RoomId
///
/// One room per username. A later join overwrites the entry without
/// touching the previous room.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    rooms: HashMap<String, RoomId>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `username` at `room_id`, returning the room it replaced
    pub fn assign(&mut self, username: String, room_id: RoomId) -> Option<RoomId> {
        self.rooms.insert(username, room_id)
    }

    pub fn room_of(&self, username: &str) -> Option<&RoomId> {
        self.rooms.get(username)
    }

    pub fn remove(&mut self, username: &str) -> Option<RoomId> {
        self.rooms.remove(username)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_register_and_remove() {
        let mut registry = ConnectionRegistry::new();
        let id = ClientId::new();

        assert!(registry.username(id).is_none());

        registry.register(id, "alice".to_string());
        assert_eq!(registry.username(id), Some("alice"));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.remove(id), Some("alice".to_string()));
        assert!(registry.username(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_rejoin_overwrites() {
        let mut registry = ConnectionRegistry::new();
        let id = ClientId::new();

        registry.register(id, "alice".to_string());
        registry.register(id, "alicia".to_string());

        assert_eq!(registry.username(id), Some("alicia"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_index_single_room_per_username() {
        let mut index = MembershipIndex::new();

        assert!(index.assign("alice".to_string(), RoomId::from("a")).is_none());
        let previous = index.assign("alice".to_string(), RoomId::from("b"));

        assert_eq!(previous, Some(RoomId::from("a")));
        assert_eq!(index.room_of("alice"), Some(&RoomId::from("b")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_remove_missing() {
        let mut index = MembershipIndex::new();
        assert!(index.remove("nobody").is_none());
        assert!(index.is_empty());
    }
}
