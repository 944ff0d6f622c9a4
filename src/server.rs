//! CollabServer Actor implementation
//!
//! The session coordinator. Owns every connection handle, the room groups
//! and the session tables, and turns each inbound event into outbound
//! messages. Commands are processed one at a time and no handler waits on
//! a client, so each event's effects are atomic with respect to the others.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::SendError;
use crate::membership::{list_members, RoomGroups};
use crate::message::{MemberInfo, ServerMessage};
use crate::registry::{ConnectionRegistry, MembershipIndex};
use crate::room::RoomStore;
use crate::types::{ClientId, RoomId};

/// Commands sent from handlers to the CollabServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection opened
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Connection closed (graceful or not)
    Disconnect { client_id: ClientId },
    /// Join a room under a username
    Join {
        client_id: ClientId,
        room_id: String,
        username: String,
    },
    /// Document text changed
    EditorChange {
        client_id: ClientId,
        room_id: String,
        value: String,
    },
    /// Selected language changed
    LanguageChange {
        client_id: ClientId,
        room_id: String,
        language: String,
    },
}

/// Session tables mutated by the coordinator
///
/// Created at startup and handed to [`CollabServer::with_state`]; lives as
/// long as the process.
#[derive(Debug, Default)]
pub struct SessionState {
    /// ClientId -> username
    pub registry: ConnectionRegistry,
    /// username -> RoomId
    pub index: MembershipIndex,
    /// RoomId -> document and language
    pub rooms: RoomStore,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The main CollabServer actor
pub struct CollabServer {
    /// All open connections: ClientId -> Client
    clients: HashMap<ClientId, Client>,
    /// Transport grouping of connections by room
    groups: RoomGroups,
    state: SessionState,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl CollabServer {
    /// Create a new CollabServer with empty session state
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_state(receiver, SessionState::new())
    }

    pub fn with_state(receiver: mpsc::Receiver<ServerCommand>, state: SessionState) -> Self {
        Self {
            clients: HashMap::new(),
            groups: RoomGroups::new(),
            state,
            receiver,
        }
    }

    /// Run the CollabServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("CollabServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("CollabServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::Join {
                client_id,
                room_id,
                username,
            } => {
                self.handle_join(client_id, RoomId::from(room_id), username);
            }
            ServerCommand::EditorChange {
                client_id,
                room_id,
                value,
            } => {
                self.handle_editor_change(client_id, RoomId::from(room_id), value);
            }
            ServerCommand::LanguageChange {
                client_id,
                room_id,
                language,
            } => {
                self.handle_language_change(client_id, RoomId::from(room_id), language);
            }
        }
    }

    /// Handle new connection
    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        info!("Client {} connected", client_id);
        self.clients.insert(client_id, Client::new(client_id, sender));
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.state.rooms.len()
        );
    }

    /// Handle room join
    ///
    /// A join never fails: a repeated username or a second room simply
    /// overwrites the tables. The previous room is not told about it.
    fn handle_join(&mut self, client_id: ClientId, room_id: RoomId, username: String) {
        if !self.clients.contains_key(&client_id) {
            return;
        }

        info!(
            "User '{}' joining room {} with connection {}",
            username, room_id, client_id
        );

        self.state.registry.register(client_id, username.clone());
        if let Some(previous) = self.state.index.assign(username.clone(), room_id.clone()) {
            if previous != room_id {
                debug!(
                    "User '{}' moved from room {} to {} without leaving",
                    username, previous, room_id
                );
            }
        }

        self.groups.join(&room_id, client_id);
        let snapshot = self.state.rooms.get_or_create(&room_id).clone();

        let clients = list_members(&self.groups, &self.state.registry, &room_id);
        debug!("Clients in room {}: {:?}", room_id, clients);

        let joined = MemberInfo {
            connection_id: client_id.to_string(),
            username: Some(username),
        };
        self.broadcast(&room_id, None, ServerMessage::member_joined(clients, joined));

        self.deliver(
            client_id,
            ServerMessage::EditorUpdate {
                value: snapshot.code,
                language: Some(snapshot.language),
            },
        );
    }

    /// Handle document change
    fn handle_editor_change(&mut self, client_id: ClientId, room_id: RoomId, value: String) {
        self.state.rooms.set_code(&room_id, value.clone());
        self.broadcast(
            &room_id,
            Some(client_id),
            ServerMessage::EditorUpdate {
                value,
                language: None,
            },
        );
    }

    /// Handle language change
    fn handle_language_change(&mut self, client_id: ClientId, room_id: RoomId, language: String) {
        self.state.rooms.set_language(&room_id, language.clone());
        self.broadcast(
            &room_id,
            Some(client_id),
            ServerMessage::LanguageUpdate { language },
        );
    }

    /// Handle connection close
    ///
    /// The connection leaves every group first, so the list sent to the
    /// remaining members no longer contains it.
    fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        self.clients.remove(&client_id);
        let left_groups = self.groups.leave_all(client_id);

        let username = self
            .state
            .registry
            .remove(client_id)
            .filter(|name| !name.is_empty());
        let room_id = username
            .as_deref()
            .and_then(|name| self.state.index.room_of(name))
            .filter(|room| !room.is_empty())
            .cloned();

        let (Some(username), Some(room_id)) = (username, room_id) else {
            debug!("Client {} left without an active room", client_id);
            return;
        };

        self.state.index.remove(&username);
        info!("User '{}' left room {}", username, room_id);

        let stale: Vec<_> = left_groups.iter().filter(|r| **r != room_id).collect();
        if !stale.is_empty() {
            debug!("User '{}' also dropped silently from {:?}", username, stale);
        }

        let remaining = list_members(&self.groups, &self.state.registry, &room_id);
        let left = MemberInfo {
            connection_id: client_id.to_string(),
            username: Some(username),
        };
        self.broadcast(&room_id, None, ServerMessage::member_left(remaining, left));

        debug!(
            "Total clients: {}, Named connections: {}, Placed users: {}, Total rooms: {}",
            self.clients.len(),
            self.state.registry.len(),
            self.state.index.len(),
            self.state.rooms.len()
        );
    }

    /// Helper: Send a message to every connection in a room, optionally skipping one
    fn broadcast(&mut self, room_id: &RoomId, except: Option<ClientId>, msg: ServerMessage) {
        let mut stalled = Vec::new();
        for member_id in self.groups.members(room_id) {
            if Some(*member_id) == except {
                continue;
            }
            if let Some(member) = self.clients.get(member_id) {
                if let Err(SendError::QueueFull) = member.send(msg.clone()) {
                    stalled.push(*member_id);
                }
            }
        }
        for member_id in stalled {
            self.drop_stalled(member_id);
        }
    }

    /// Helper: Send a message to a single connection
    fn deliver(&mut self, client_id: ClientId, msg: ServerMessage) {
        let Some(client) = self.clients.get(&client_id) else {
            return;
        };
        if let Err(SendError::QueueFull) = client.send(msg) {
            self.drop_stalled(client_id);
        }
    }

    /// Helper: Forget the handle of a client whose queue is full
    ///
    /// Once the sender is gone the connection's write task stops after
    /// flushing what is already queued, closes the socket, and the handler
    /// reports the disconnect as usual.
    fn drop_stalled(&mut self, client_id: ClientId) {
        if let Some(client) = self.clients.remove(&client_id) {
            warn!("Client {} is not reading its messages, dropping it", client.id);
        }
    }
}
