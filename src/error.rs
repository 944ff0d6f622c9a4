//! Error types for the relay
//!
//! Defines connection-level errors, message send errors and startup
//! configuration errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// None of these reach a client: fatal variants end the one connection
/// they occurred on, `InvalidPayload` only drops the offending event.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - coordinator is gone)
    #[error("Channel send error")]
    ChannelSend,

    /// Inbound message could not be decoded or lacks a required field
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Message send errors
///
/// Occurs when a client's outbound channel cannot take another message.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The client is not draining its channel
    #[error("Send queue full")]
    QueueFull,
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),
}
