//! Room state
//!
//! Each room holds the latest document text and selected language.
//! Rooms are created on first reference and never removed.

use std::collections::HashMap;

use crate::types::RoomId;

/// Language a room starts with until someone changes it
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Shared editor state of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    /// Current document text
    pub code: String,
    /// Current language tag
    pub language: String,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            code: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// RoomId -> RoomState
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomId, RoomState>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the room's state, inserting the default record if absent
    pub fn get_or_create(&mut self, room_id: &RoomId) -> &mut RoomState {
        self.rooms.entry(room_id.clone()).or_default()
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&RoomState> {
        self.rooms.get(room_id)
    }

    /// Overwrite the document text (last writer wins)
    pub fn set_code(&mut self, room_id: &RoomId, code: String) {
        self.get_or_create(room_id).code = code;
    }

    /// Overwrite the language tag (last writer wins)
    pub fn set_language(&mut self, room_id: &RoomId, language: String) {
        self.get_or_create(room_id).language = language;
    }

    /// Number of rooms ever referenced
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
    fn test_room_defaults() {
        let state = RoomState::default();
        assert_eq!(state.code, "");
        assert_eq!(state.language, "javascript");
    }

    #[test]
    fn test_get_or_create_inserts_once() {
        let mut store = RoomStore::new();
        let room = RoomId::from("r1");

        assert!(store.get(&room).is_none());
        assert_eq!(*store.get_or_create(&room), RoomState::default());
        store.get_or_create(&room);

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_edit_creates_room() {
        let mut store = RoomStore::new();
        let room = RoomId::from("r1");

        store.set_code(&room, "print(1)".to_string());

        let state = store.get(&room).unwrap();
        assert_eq!(state.code, "print(1)");
        assert_eq!(state.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_language_change_keeps_code() {
        let mut store = RoomStore::new();
        let room = RoomId::from("r1");

        store.set_code(&room, "x = 1".to_string());
        store.set_language(&room, "python".to_string());

        let state = store.get(&room).unwrap();
        assert_eq!(state.code, "x = 1");
        assert_eq!(state.language, "python");
    }

    #[test]
    fn test_rooms_are_independent() {
        let mut store = RoomStore::new();
        store.set_code(&RoomId::from("a"), "a".to_string());
        store.set_code(&RoomId::from("b"), "b".to_string());

        assert_eq!(store.get(&RoomId::from("a")).unwrap().code, "a");
        assert_eq!(store.get(&RoomId::from("b")).unwrap().code, "b");
        assert_eq!(store.len(), 2);
    }
}
