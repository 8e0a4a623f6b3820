//! Realtime Router

use std::sync::Arc;

use axum::{Router, routing::get};

use auth::application::authenticate::AccessVerifier;
use auth::domain::repository::SessionRepository;

use crate::config::RealtimeConfig;
use crate::directory::ConnectionDirectory;
use crate::handler::{RealtimeState, ws_handler};

/// Create the realtime router; serves the upgrade at `/ws`
pub fn realtime_router<S>(
    directory: Arc<ConnectionDirectory>,
    verifier: AccessVerifier<S>,
    config: Arc<RealtimeConfig>,
) -> Router
where
    S: SessionRepository + Send + Sync + 'static,
{
    let state = RealtimeState {
        directory,
        verifier,
        config,
    };

    Router::new()
        .route("/ws", get(ws_handler::<S>))
        .with_state(state)
}
