use std::sync::Arc;
use std::time::Duration;

use crate::directory::ConnectionDirectory;

/// Spawn a background task that sends periodic Ping frames to all
/// connected realtime clients.
///
/// The returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(
    directory: Arc<ConnectionDirectory>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let count = directory.connection_count().await;
            tracing::debug!(count, "Realtime heartbeat ping");
            directory.ping_all().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;
    use kernel::id::{IdentityId, SessionId};

    use super::*;
    use crate::directory::ConnectionHandle;

    #[tokio::test]
    async fn test_heartbeat_pings_connections() {
        let directory = Arc::new(ConnectionDirectory::new());
        let (handle, mut rx) = ConnectionHandle::new(SessionId::new());
        directory.register(IdentityId::new(), handle).await;

        let task = start_heartbeat(directory.clone(), Duration::from_millis(20));
        let received = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        task.abort();

        assert!(matches!(received, Ok(Some(Message::Ping(_)))));
    }
}
