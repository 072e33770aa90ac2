//! WebSocket adapter between remote peers and the relay hub

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

use crate::app::AppState;
use crate::net::protocol::{Inbound, Outbound};
use crate::util::rate_limit::ConnectionRateLimiter;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Relay one upgraded connection until either side closes
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (id, mut inbound_rx) = state.hub.connect();
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Writer task: hub -> WebSocket
    let writer_id = id.clone();
    let writer_handle = tokio::spawn(async move {
        while let Some(msg) = inbound_rx.recv().await {
            let text = match Inbound::encode(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!(peer_id = %writer_id, error = %e, "Failed to encode relay message");
                    continue;
                }
            };
            if let Err(e) = ws_sink.send(Message::Text(text)).await {
                debug!(peer_id = %writer_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    // Reader loop: WebSocket -> hub
    let rate_limiter = ConnectionRateLimiter::new(state.config.relay_msg_rate);
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check() {
                    warn!(peer_id = %id, "Rate limited relay message");
                    continue;
                }
                match Outbound::decode(&text) {
                    Ok(msg) => state.hub.publish(&id, msg),
                    Err(e) => {
                        warn!(peer_id = %id, error = %e, "Failed to parse peer message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(peer_id = %id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(peer_id = %id, "Peer initiated close");
                break;
            }
            Err(e) => {
                error!(peer_id = %id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    state.hub.disconnect(&id);
    writer_handle.abort();
}
