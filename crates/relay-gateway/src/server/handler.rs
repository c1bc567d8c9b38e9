//! WebSocket handler
//!
//! Bridges one upgraded socket to one `Session`: a reader loop feeding the
//! session in arrival order, and a writer task that is the only thing that
//! writes to the socket.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::connection::{Connection, ConnectionId};
use crate::handlers::{HandlerError, Session};
use crate::protocol::Frame;
use crate::server::GatewayState;

/// WebSocket upgrade handler
pub async fn ws_handler(State(state): State<GatewayState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let (tx, mut rx) = mpsc::channel::<Frame>(state.chat().outbound_buffer);
    let connection = Connection::new(ConnectionId::generate(), tx);
    let connection_id = connection.id();
    let mut session = Session::open(state, connection.clone());

    let (mut ws_sink, mut ws_stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sink.send(Message::Text(frame.to_string())).await.is_err() {
                tracing::debug!(connection_id = %connection_id, "Socket write failed");
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    loop {
        tokio::select! {
            msg = ws_stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = session.handle_text(&text).await {
                        log_handler_error(connection_id, &e);
                        if e.is_expected() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!(connection_id = %connection_id, "Binary frame ignored");
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(connection_id = %connection_id, "Client closed connection");
                    break;
                }
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = &mut send_task => {
                tracing::debug!(connection_id = %connection_id, "Writer ended");
                break;
            }
            () = connection.shutdown_requested() => {
                tracing::info!(connection_id = %connection_id, "Disconnecting slow consumer");
                break;
            }
        }
    }

    session.close();
    send_task.abort();
}

fn log_handler_error(connection_id: ConnectionId, error: &HandlerError) {
    match error {
        HandlerError::MalformedEvent(reason) => {
            tracing::debug!(connection_id = %connection_id, reason = %reason, "Malformed event ignored");
        }
        HandlerError::TransportClosed => {
            tracing::trace!(connection_id = %connection_id, "Transport closed");
        }
        HandlerError::StoreUnavailable(_) | HandlerError::DeliveryFailure { .. } => {
            tracing::warn!(connection_id = %connection_id, error = %error, "Event handling failed");
        }
    }
}
