use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::AppState;
use crate::bus::SessionRegistry;

pub async fn upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_session(socket, state.registry.clone()))
}

/// Pump notifications to one connected session until it goes away.
///
/// The session is registered for the lifetime of this task and unregistered
/// on any exit path, so a dead socket stops receiving fan-out sends at the
/// next broadcast. Each session drains its own queue; a slow consumer only
/// delays itself.
async fn serve_session(socket: WebSocket, registry: Arc<SessionRegistry>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let session_id = registry.register(tx);

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(message) => {
                    if sink.send(Message::Text(message.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Clients only listen on this channel; inbound frames
                // (pings, stray text) need no reply beyond what axum
                // handles automatically.
                Some(Ok(_)) => {}
            },
        }
    }

    registry.unregister(&session_id);
}
