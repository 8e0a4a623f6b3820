//! Connection Directory
//!
//! Live realtime connections keyed by identity. Shared via `Arc` between
//! the socket handler (register / deregister) and anything that pushes
//! events (lookup / push). One connection per identity: a newer
//! registration replaces the older one, which is sent a Close frame.

use std::collections::HashMap;
use std::fmt;

use axum::body::Bytes;
use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use kernel::id::{IdentityId, SessionId};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::event::ServerEvent;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// Identifies one socket, so a stale socket cannot deregister its successor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Outbound side of one authenticated connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub connection_id: ConnectionId,
    /// Session the handshake token was minted for
    pub session_id: SessionId,
    pub connected_at: DateTime<Utc>,
    sender: ConnectionSender,
}

impl ConnectionHandle {
    /// Returns the receiver half; the caller forwards it to the socket sink.
    pub fn new(session_id: SessionId) -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = Self {
            connection_id: ConnectionId::new(),
            session_id,
            connected_at: Utc::now(),
            sender,
        };
        (handle, receiver)
    }

    fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }
}

/// Manages all authenticated connections.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`.
pub struct ConnectionDirectory {
    connections: RwLock<HashMap<IdentityId, ConnectionHandle>>,
}

impl ConnectionDirectory {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `handle` to `identity_id`, replacing any earlier connection.
    pub async fn register(&self, identity_id: IdentityId, handle: ConnectionHandle) -> ConnectionId {
        let connection_id = handle.connection_id;
        let replaced = self.connections.write().await.insert(identity_id, handle);

        if let Some(old) = replaced {
            tracing::debug!(
                identity_id = %identity_id,
                connection_id = %old.connection_id,
                "Replacing earlier realtime connection"
            );
            old.send(Message::Close(None));
        }

        connection_id
    }

    /// Remove the entry only if `connection_id` still owns it.
    pub async fn deregister(&self, identity_id: IdentityId, connection_id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(&identity_id) {
            Some(handle) if handle.connection_id == connection_id => {
                connections.remove(&identity_id);
                true
            }
            _ => false,
        }
    }

    pub async fn lookup(&self, identity_id: IdentityId) -> Option<ConnectionHandle> {
        self.connections.read().await.get(&identity_id).cloned()
    }

    /// Send an event to the identity's live connection.
    ///
    /// Returns `false` when the identity is offline or its socket is
    /// already gone. Delivery past the channel is not confirmed.
    pub async fn push(&self, identity_id: IdentityId, event: &ServerEvent) -> bool {
        let Some(handle) = self.lookup(identity_id).await else {
            return false;
        };

        match event.to_message() {
            Ok(message) => handle.send(message),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode realtime event");
                false
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut connections = self.connections.write().await;
        let count = connections.len();
        for handle in connections.values() {
            handle.send(Message::Close(None));
        }
        connections.clear();
        tracing::info!(count, "Closed all realtime connections");
    }

    /// Send a Ping frame to every connection.
    pub async fn ping_all(&self) {
        let connections = self.connections.read().await;
        for handle in connections.values() {
            handle.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for ConnectionDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(message: Message) -> serde_json::Value {
        match message {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_and_push() {
        let directory = ConnectionDirectory::new();
        let identity = IdentityId::new();
        let (handle, mut rx) = ConnectionHandle::new(SessionId::new());

        directory.register(identity, handle).await;
        assert_eq!(directory.connection_count().await, 1);

        let event = ServerEvent::Connected { user_id: identity };
        assert!(directory.push(identity, &event).await);
        assert_eq!(text(rx.recv().await.unwrap())["event"], "connected");
    }

    #[tokio::test]
    async fn test_push_to_offline_identity() {
        let directory = ConnectionDirectory::new();
        let event = ServerEvent::Notification(serde_json::json!({}));
        assert!(!directory.push(IdentityId::new(), &event).await);
    }

    #[tokio::test]
    async fn test_push_after_receiver_dropped() {
        let directory = ConnectionDirectory::new();
        let identity = IdentityId::new();
        let (handle, rx) = ConnectionHandle::new(SessionId::new());
        directory.register(identity, handle).await;
        drop(rx);

        let event = ServerEvent::Notification(serde_json::json!({}));
        assert!(!directory.push(identity, &event).await);
    }

    #[tokio::test]
    async fn test_newer_registration_wins() {
        let directory = ConnectionDirectory::new();
        let identity = IdentityId::new();

        let (first, mut first_rx) = ConnectionHandle::new(SessionId::new());
        let first_id = directory.register(identity, first).await;
        let (second, mut second_rx) = ConnectionHandle::new(SessionId::new());
        let second_id = directory.register(identity, second).await;

        assert_eq!(directory.connection_count().await, 1);
        assert!(matches!(first_rx.recv().await, Some(Message::Close(None))));
        assert_eq!(
            directory.lookup(identity).await.unwrap().connection_id,
            second_id
        );

        // The replaced socket's cleanup must not evict its successor
        assert!(!directory.deregister(identity, first_id).await);
        assert_eq!(directory.connection_count().await, 1);

        let event = ServerEvent::Notification(serde_json::json!({"n": 1}));
        assert!(directory.push(identity, &event).await);
        assert_eq!(text(second_rx.recv().await.unwrap())["data"]["n"], 1);

        assert!(directory.deregister(identity, second_id).await);
        assert_eq!(directory.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_all_closes_and_clears() {
        let directory = ConnectionDirectory::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (handle, rx) = ConnectionHandle::new(SessionId::new());
            directory.register(IdentityId::new(), handle).await;
            receivers.push(rx);
        }

        directory.shutdown_all().await;

        assert_eq!(directory.connection_count().await, 0);
        for mut rx in receivers {
            assert!(matches!(rx.recv().await, Some(Message::Close(None))));
        }
    }

    #[tokio::test]
    async fn test_ping_all() {
        let directory = ConnectionDirectory::new();
        let (handle, mut rx) = ConnectionHandle::new(SessionId::new());
        directory.register(IdentityId::new(), handle).await;

        directory.ping_all().await;
        assert!(matches!(rx.recv().await, Some(Message::Ping(_))));
    }
}
