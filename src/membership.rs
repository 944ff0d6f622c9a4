//! Room grouping and member resolution
//!
//! `RoomGroups` is the transport-side grouping of connections under a
//! room. It knows nothing about usernames; `list_members` joins it with
//! the `ConnectionRegistry` to produce a membership list.

use std::collections::HashMap;

use crate::message::MemberInfo;
use crate::registry::ConnectionRegistry;
use crate::types::{ClientId, RoomId};

/// RoomId -> connections grouped under it
///
/// A connection can sit in several groups at once. Order within a group
/// follows insertion but callers must not rely on it.
#[derive(Debug, Default)]
pub struct RoomGroups {
    groups: HashMap<RoomId, Vec<ClientId>>,
}

impl RoomGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room's group
    ///
    /// Returns false if it was already there.
    pub fn join(&mut self, room_id: &RoomId, client_id: ClientId) -> bool {
        let members = self.groups.entry(room_id.clone()).or_default();
        if members.contains(&client_id) {
            false
        } else {
            members.push(client_id);
            true
        }
    }

    /// Remove a connection from every group, returning the rooms it left
    ///
    /// Groups that become empty are dropped.
    pub fn leave_all(&mut self, client_id: ClientId) -> Vec<RoomId> {
        let mut left = Vec::new();
        self.groups.retain(|room_id, members| {
            if let Some(pos) = members.iter().position(|id| *id == client_id) {
                members.remove(pos);
                left.push(room_id.clone());
            }
            !members.is_empty()
        });
        left
    }

    /// Connections currently grouped under `room_id`
    pub fn members(&self, room_id: &RoomId) -> &[ClientId] {
        self.groups.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, room_id: &RoomId, client_id: ClientId) -> bool {
        self.members(room_id).contains(&client_id)
    }
}

/// Snapshot of a room's members paired with their registered usernames
///
/// Built fresh on every call.
pub fn list_members(
    groups: &RoomGroups,
    registry: &ConnectionRegistry,
    room_id: &RoomId,
) -> Vec<MemberInfo> {
    groups
        .members(room_id)
        .iter()
        .map(|&client_id| MemberInfo {
            connection_id: client_id.to_string(),
            username: registry.username(client_id).map(str::to_string),
        })
        .collect()
}
