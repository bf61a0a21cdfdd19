//! WebSocket presence hub at `/online`.
//!
//! A socket is one connection handle. Opening it registers presence and
//! notifies friends; closing it, for any reason, does the reverse.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use gauniv_domain::{ConnectionId, UserId};
use gauniv_shared::messages::{ClientMessage, ServerMessage};

use super::http::{user_id_from_headers, ApiError};
use crate::app::App;
use crate::use_cases::presence::CloseReason;

/// Outbound queue depth per socket. Presence events past this are dropped.
const CONNECTION_CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Default, Deserialize)]
pub struct HubParams {
    /// Fallback for browsers, which cannot set headers on a WebSocket handshake.
    user_id: Option<String>,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Query(params): Query<HubParams>,
) -> Response {
    let user_id = match resolve_identity(&headers, params) {
        Ok(user_id) => user_id,
        Err(e) => return e.into_response(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, app, user_id))
}

fn resolve_identity(headers: &HeaderMap, params: HubParams) -> Result<UserId, ApiError> {
    if let Some(user_id) = user_id_from_headers(headers)? {
        return Ok(user_id);
    }
    match params.user_id.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => UserId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string())),
        None => Err(ApiError::Unauthorized),
    }
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, app: Arc<App>, user_id: UserId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let connection_id = ConnectionId::new();
    let lifecycle = app.use_cases.presence.lifecycle.clone();

    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);
    // Attach before registering so a friend's fanout never finds a registered
    // connection without a channel.
    if !app.connections.attach(connection_id, tx) {
        tracing::error!(connection_id = %connection_id, "Connection id already attached");
        let _ = ws_sender.send(Message::Close(None)).await;
        return;
    }

    if let Err(e) = lifecycle.on_opened(connection_id, user_id.clone()).await {
        if e.is_fatal() {
            app.connections.detach(connection_id);
            let _ = ws_sender.send(Message::Close(None)).await;
            return;
        }
        tracing::warn!(
            connection_id = %connection_id,
            user_id = %user_id,
            error = %e,
            "Online notification failed"
        );
    }

    tracing::info!(
        connection_id = %connection_id,
        user_id = %user_id,
        "WebSocket connection established"
    );

    // Forward queued messages to the socket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    let mut shutdown = app.shutdown_signal();
    let reason = loop {
        let frame = tokio::select! {
            frame = ws_receiver.next() => frame,
            _ = shutdown.wait_for(|stopping| *stopping) => break CloseReason::ServerShutdown,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                let reply = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(ClientMessage::Ping) => Some(ServerMessage::Pong),
                    Ok(ClientMessage::Unknown) => {
                        tracing::debug!(connection_id = %connection_id, "Ignoring unknown message type");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
                        Some(ServerMessage::error(
                            "PARSE_ERROR",
                            format!("Invalid message format: {}", e),
                        ))
                    }
                };
                if let Some(reply) = reply {
                    if let Err(e) = app.connections.send(connection_id, reply) {
                        tracing::warn!(connection_id = %connection_id, error = %e, "Failed to send reply");
                    }
                }
            }
            Some(Ok(Message::Close(_))) | None => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break CloseReason::ClientClosed;
            }
            Some(Err(e)) => {
                tracing::warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                break CloseReason::TransportError;
            }
            Some(Ok(_)) => {}
        }
    };

    if let Err(e) = lifecycle.on_closed(connection_id, reason).await {
        tracing::warn!(
            connection_id = %connection_id,
            user_id = %user_id,
            error = %e,
            "Offline notification failed"
        );
    }
    // Dropping the last sender ends the writer task once the queue drains
    app.connections.detach(connection_id);
    if reason != CloseReason::ServerShutdown {
        send_task.abort();
    }

    tracing::info!(
        connection_id = %connection_id,
        reason = ?reason,
        "WebSocket connection terminated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn params(user_id: Option<&str>) -> HubParams {
        HubParams {
            user_id: user_id.map(String::from),
        }
    }

    #[test]
    fn header_wins_over_query() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("from-header"));

        let id = resolve_identity(&headers, params(Some("from-query"))).unwrap();

        assert_eq!(id.as_str(), "from-header");
    }

    #[test]
    fn query_is_used_without_header() {
        let id = resolve_identity(&HeaderMap::new(), params(Some("from-query"))).unwrap();
        assert_eq!(id.as_str(), "from-query");
    }

    #[test]
    fn missing_identity_is_unauthorized() {
        assert!(matches!(
            resolve_identity(&HeaderMap::new(), params(None)),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            resolve_identity(&HeaderMap::new(), params(Some(" "))),
            Err(ApiError::Unauthorized)
        ));
    }
}
