//! WebSocket upgrade and per-connection handler: greet, relay frames, forward shutdown.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::relay::{greeting, SHUTDOWN_COMMAND, SHUTDOWN_KEY};
use crate::state::AppState;

use std::collections::HashMap;
use std::sync::atomic::Ordering;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if let Some(expected) = state.auth_token.as_ref() {
        match q.get("token") {
            Some(t) if t == expected => {}
            _ => return StatusCode::UNAUTHORIZED.into_response(),
        }
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let n = state.client_count.fetch_add(1, Ordering::Relaxed) + 1;
    info!(clients = n, "client connected");

    // Ensure we decrement on disconnect (drop).
    struct ClientGuard(AppState);
    impl Drop for ClientGuard {
        fn drop(&mut self) {
            let n = self.0.client_count.fetch_sub(1, Ordering::Relaxed) - 1;
            info!(clients = n, "client disconnected");
        }
    }
    let _guard = ClientGuard(state.clone());

    // Subscribe before greeting so nothing broadcast after the greeting is missed.
    let mut frames = state.frames.subscribe();
    let (mut sink, mut stream) = socket.split();

    match greeting(state.is_standby()).to_json() {
        Ok(js) => {
            if sink.send(Message::Text(js)).await.is_err() {
                return;
            }
        }
        Err(e) => warn!(error = %e, "greeting serialization failed"),
    }

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(js) => {
                    if sink.send(Message::Text(js)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "client lagging, frames dropped"),
                Err(RecvError::Closed) => break,
            },
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => handle_command(&text, &state).await,
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn handle_command(text: &str, state: &AppState) {
    if text != SHUTDOWN_COMMAND {
        debug!(%text, "ignoring client message");
        return;
    }
    warn!("shutdown signal received from client");
    let mut kernel = state.kernel.lock().await;
    let Some(w) = kernel.as_mut() else {
        warn!("kernel link not active, shutdown not delivered");
        return;
    };
    let sent = async {
        w.write_all(SHUTDOWN_KEY).await?;
        w.flush().await
    }
    .await;
    match sent {
        Ok(()) => info!("shutdown key sent to kernel"),
        Err(e) => warn!(error = %e, "shutdown key not delivered"),
    }
}
