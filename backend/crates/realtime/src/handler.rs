//! WebSocket Upgrade Handler
//!
//! Connection lifecycle:
//!   1. Wait for the handshake frame (bounded by `handshake_timeout`).
//!   2. Rejected: send `connect_error`, close. Nothing is registered.
//!   3. Accepted: send `connected`, register in the directory, then spawn
//!      a sender task that drains the directory channel into the sink.
//!   4. Read inbound frames until the client goes away, then deregister.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};

use auth::application::authenticate::AccessVerifier;
use auth::domain::repository::SessionRepository;

use crate::config::RealtimeConfig;
use crate::directory::{ConnectionDirectory, ConnectionHandle};
use crate::event::ServerEvent;
use crate::gate::authenticate_handshake;

/// Shared state for the realtime router
pub struct RealtimeState<S>
where
    S: SessionRepository,
{
    pub directory: Arc<ConnectionDirectory>,
    pub verifier: AccessVerifier<S>,
    pub config: Arc<RealtimeConfig>,
}

impl<S> Clone for RealtimeState<S>
where
    S: SessionRepository,
{
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            verifier: self.verifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// HTTP handler that upgrades the connection to WebSocket
pub async fn ws_handler<S>(
    ws: WebSocketUpgrade,
    State(state): State<RealtimeState<S>>,
) -> impl IntoResponse
where
    S: SessionRepository + Send + Sync + 'static,
{
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket<S>(socket: WebSocket, state: RealtimeState<S>)
where
    S: SessionRepository + Send + Sync + 'static,
{
    let (mut sink, mut stream) = socket.split();

    let frame = tokio::time::timeout(
        state.config.handshake_timeout,
        next_text_frame(&mut stream),
    )
    .await
    .ok()
    .flatten();

    let context = match authenticate_handshake(&state.verifier, frame.as_deref()).await {
        Ok(context) => context,
        Err(err) => {
            tracing::debug!(reason = %err, "Realtime handshake rejected");
            let rejection = ServerEvent::ConnectError {
                message: err.to_string(),
            };
            if let Ok(message) = rejection.to_message() {
                let _ = sink.send(message).await;
            }
            let _ = sink.send(Message::Close(None)).await;
            return;
        }
    };

    let identity_id = context.identity_id;
    let connected = ServerEvent::Connected { user_id: identity_id };
    match connected.to_message() {
        Ok(message) => {
            if sink.send(message).await.is_err() {
                return;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode realtime event");
            return;
        }
    }

    let (handle, mut rx) = ConnectionHandle::new(context.session_id);
    let connection_id = state.directory.register(identity_id, handle).await;
    tracing::info!(
        identity_id = %identity_id,
        connection_id = %connection_id,
        "Realtime connection established"
    );

    // Sender task: forward channel messages to the WebSocket sink.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(connection_id = %connection_id, "Pong received");
            }
            // Inbound application frames carry no meaning after the handshake.
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    state.directory.deregister(identity_id, connection_id).await;
    send_task.abort();
    tracing::info!(
        identity_id = %identity_id,
        connection_id = %connection_id,
        "Realtime connection closed"
    );
}

/// First text frame, skipping control frames. `None` if the client leaves.
async fn next_text_frame(stream: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => return Some(text.to_string()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}
