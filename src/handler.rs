//! WebSocket connection handler
//!
//! Runs the read/write pumps between one upgraded socket and the
//! CollabServer actor.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Outbound buffer per connection
pub const CLIENT_BUFFER_SIZE: usize = 32;

/// Run one WebSocket connection to completion
///
/// Registers with the CollabServer and always reports the disconnect
/// once either pump stops.
pub async fn handle_socket(
    socket: WebSocket,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let client_id = ClientId::new();
    info!("Client {} connected", client_id);

    // Channel for server -> client messages
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(CLIENT_BUFFER_SIZE);

    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    let connected_msg = ServerMessage::Connected {
        connection_id: client_id.to_string(),
    };
    let json = serde_json::to_string(&connected_msg)?;
    if let Err(e) = ws_sender.send(Message::Text(json.into())).await {
        let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;
        return Err(e.into());
    }

    let cmd_tx_read = cmd_tx.clone();

    // Read task (WebSocket -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => match ClientMessage::parse(text.as_str()) {
                    Ok(client_msg) => {
                        let cmd = client_message_to_command(client_id, client_msg);
                        if cmd_tx_read.send(cmd).await.is_err() {
                            debug!("Server closed, ending read task for {}", client_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Dropping event from {}: {}", client_id, e);
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(_) => {
                    // Binary, ping and pong frames carry no events
                }
                Err(e) => {
                    debug!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Write task (ServerMessage -> WebSocket)
    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                }
            }
        }
        debug!("Write task ended for {}", client_id);

        let _ = ws_sender.close().await;
    });

    // Whichever pump stops first ends the connection. The write task is
    // left to finish on its own: it closes the socket once the server
    // drops this client's sender.
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", client_id);
            read_task.abort();
        }
    }

    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Convert a ClientMessage to a ServerCommand
fn client_message_to_command(client_id: ClientId, msg: ClientMessage) -> ServerCommand {
    match msg {
        ClientMessage::Join { room_id, username } => ServerCommand::Join {
            client_id,
            room_id,
            username,
        },
        ClientMessage::EditorChange { room_id, value } => ServerCommand::EditorChange {
            client_id,
            room_id,
            value,
        },
        ClientMessage::LanguageChange { room_id, language } => ServerCommand::LanguageChange {
            client_id,
            room_id,
            language,
        },
    }
}
