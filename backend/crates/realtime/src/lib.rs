//! Realtime Channel
//!
//! WebSocket endpoint that authenticates once at handshake time and then
//! delivers server events addressed by identity.
//!
//! - `directory` - live connections, one per identity
//! - `gate` - handshake authentication (same policy as the HTTP gate)
//! - `handler` - upgrade handler and per-connection tasks
//! - `heartbeat` - periodic pings

pub mod config;
pub mod directory;
pub mod event;
pub mod gate;
pub mod handler;
pub mod heartbeat;
pub mod router;

pub use config::RealtimeConfig;
pub use directory::{ConnectionDirectory, ConnectionHandle, ConnectionId};
pub use event::ServerEvent;
pub use handler::RealtimeState;
pub use heartbeat::start_heartbeat;
pub use router::realtime_router;
