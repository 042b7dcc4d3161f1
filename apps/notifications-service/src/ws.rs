//! Websocket endpoint pushing relayed task events to clients.

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct WsState {
    tx: broadcast::Sender<String>,
}

/// Router exposing `GET /ws` for push notification subscriptions.
pub fn ws_router(tx: broadcast::Sender<String>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(WsState { tx })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WsState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state.tx.subscribe()))
}

/// One connected client. Frames flow one way, server to client; the read
/// half exists only to notice disconnects.
async fn handle_session(socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    info!("Websocket client connected");

    let (mut sink, mut stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(frame) => {
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Client fell behind; events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!("Websocket client disconnected");
}
