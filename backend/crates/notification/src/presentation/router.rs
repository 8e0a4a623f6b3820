//! Notification Router

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use auth::AccessVerifier;
use auth::domain::repository::SessionRepository;
use auth::middleware::require_auth;

use crate::application::service::NotificationService;
use crate::domain::repository::NotificationRepository;
use crate::presentation::handlers;

/// Create the notification router, gated by `verifier`
///
/// Mount under `/notifications`.
pub fn notification_router<R, S>(
    service: NotificationService<R>,
    verifier: AccessVerifier<S>,
) -> Router
where
    R: NotificationRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::list::<R>))
        .route("/read-all", patch(handlers::mark_all_read::<R>))
        .route_layer(middleware::from_fn_with_state(verifier, require_auth::<S>))
        .with_state(service)
}
