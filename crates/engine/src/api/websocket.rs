//! WebSocket handling for game connections.
//!
//! Each connection gets its own negotiation session and agent; nothing is
//! shared between games except the broadcast registry.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use gamemind_shared::OutgoingMessage;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::app::App;
use crate::use_cases::negotiation::SessionDriver;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app): State<Arc<App>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, app: Arc<App>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<String>(CONNECTION_CHANNEL_BUFFER);

    app.connections
        .register(connection_id, app.clock.now(), tx.clone());

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Whatever the game registered before this connection is unknown to us.
    match OutgoingMessage::ReregisterAll.to_json() {
        Ok(json) => {
            if tx.try_send(json).is_err() {
                tracing::warn!(connection_id = %connection_id, "Failed to queue reregister_all");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to encode reregister_all"),
    }

    let send_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let session = SessionDriver::new(app.new_session(), app.new_agent(), tx).spawn();

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !session.send_text(text.as_str().to_owned()).await {
                    tracing::warn!(connection_id = %connection_id, "Session driver stopped");
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    app.connections.unregister(connection_id);
    drop(session);
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}
