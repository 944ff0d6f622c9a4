//! Collaborative Editor Relay - Entry Point
//!
//! Starts the TCP listener and CollabServer actor, accepting connections.

use std::env;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use code_relay::{serve, CollabServer, Config, SessionState};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG to control log level, e.g. RUST_LOG=code_relay=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("code_relay=info")),
        )
        .init();

    // A bind address on the command line beats HOST/PORT
    let addr = match env::args().nth(1) {
        Some(addr) => addr,
        None => Config::from_env()?.bind_addr(),
    };

    let listener = TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let server = CollabServer::with_state(cmd_rx, SessionState::new());
    tokio::spawn(server.run());

    info!("CollabServer actor started");

    serve(listener, cmd_tx).await?;

    Ok(())
}
