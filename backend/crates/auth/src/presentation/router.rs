//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::authenticate::AccessVerifier;
use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRegistry, IdentityRepository, SessionRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the Auth router for any repository implementation
///
/// Mount under `/auth` so the refresh cookie path matches the route.
pub fn auth_router<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    let verifier = AccessVerifier::new(repo.clone(), config.clone());
    let state = AuthAppState { repo, config };

    let protected = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(middleware::from_fn_with_state(verifier, require_auth::<R>));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .merge(protected)
        .with_state(state)
}
