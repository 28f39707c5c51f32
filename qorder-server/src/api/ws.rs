//! Staff WebSocket — forwards the organization's event stream
//!
//! Pure fan-out: no replay for late subscribers, and a client that falls
//! behind far enough to lag the broadcast buffer just keeps going — events
//! are "re-fetch" signals, so missing some loses nothing that a re-fetch
//! will not recover.

use axum::Extension;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::auth::StaffIdentity;
use crate::state::AppState;

/// GET /api/ws — upgrade to WebSocket
pub async fn handle_staff_ws(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, identity))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState, identity: StaffIdentity) {
    let org_id = identity.organization_id;
    let mut rx = state.events.subscribe(org_id);

    tracing::info!(
        user_id = identity.user_id,
        org_id,
        "Staff WebSocket connected"
    );

    let (mut ws_sink, mut ws_stream) = socket.split();

    loop {
        tokio::select! {
            // Event to forward
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event)
                            && ws_sink.send(Message::Text(json.into())).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(org_id, skipped, "WebSocket subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Incoming frames: only keepalives matter
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!(org_id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {} // Text, Binary, Pong — ignore
                }
            }
        }
    }

    let _ = ws_sink.close().await;
    drop(rx);
    state.events.release(org_id);

    tracing::info!(user_id = identity.user_id, org_id, "Staff WebSocket closed");
}
