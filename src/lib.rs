//! Realtime Collaborative Editor Relay Library
//!
//! Clients join named rooms over WebSocket, share one document and one
//! language selection per room, and get membership updates as peers come
//! and go. Concurrent edits are last-writer-wins.
//!
//! # Protocol
//! - `join { roomId, username }` → `updateMembers` to the room, then
//!   `editorUpdate { value, language }` to the joiner
//! - `editorChange { roomId, value }` → `editorUpdate { value }` to the others
//! - `languageChange { roomId, language }` → `languageUpdate` to the others
//! - disconnect → `updateMembers` with `leftUser` to the remaining members
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `CollabServer` is the central actor owning all session state
//! - axum serves `GET /` (health) and `GET /ws` (WebSocket upgrade)
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use code_relay::{serve, CollabServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(CollabServer::new(cmd_rx).run());
//!     serve(listener, cmd_tx).await.unwrap();
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod membership;
pub mod message;
pub mod registry;
pub mod room;
pub mod router;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use config::Config;
pub use error::{AppError, ConfigError, SendError};
pub use handler::handle_socket;
pub use membership::{list_members, RoomGroups};
pub use message::{ClientMessage, MemberInfo, ServerMessage};
pub use registry::{ConnectionRegistry, MembershipIndex};
pub use room::{RoomState, RoomStore, DEFAULT_LANGUAGE};
pub use router::{build_router, serve, AppState};
pub use server::{CollabServer, ServerCommand, SessionState};
pub use types::{ClientId, RoomId};
