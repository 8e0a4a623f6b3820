//! Realtime Configuration

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// How long a new socket may take to send its handshake frame
    pub handshake_timeout: Duration,
    /// Interval between heartbeat pings
    pub heartbeat_interval: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
        }
    }
}
