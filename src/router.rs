//! HTTP surface of the relay
//!
//! `GET /` is a static liveness check, `GET /ws` upgrades to the relay
//! WebSocket. Cross-origin access is unrestricted.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::AppError;
use crate::handler::handle_socket;
use crate::server::ServerCommand;

/// Body of the liveness endpoint
pub const HEALTH_BODY: &str = "Server is working";

/// Shared state handed to axum handlers
#[derive(Clone)]
pub struct AppState {
    /// Command channel into the CollabServer actor
    pub cmd_tx: mpsc::Sender<ServerCommand>,
}

/// Build the router with all routes
pub fn build_router(cmd_tx: mpsc::Sender<ServerCommand>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/ws", get(ws_handler))
        .with_state(AppState { cmd_tx })
        .layer(CorsLayer::permissive())
}

/// Serve the router on an already-bound listener until it fails
pub async fn serve(
    listener: TcpListener,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Accepting connections on {}", addr);
    }
    axum::serve(listener, build_router(cmd_tx)).await?;
    Ok(())
}

async fn health_handler() -> &'static str {
    HEALTH_BODY
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = handle_socket(socket, state.cmd_tx).await {
            error!("Connection handler error: {}", e);
        }
    })
}
