//! Auth Middleware
//!
//! Gate for protected routes. Reads the access token from the
//! `accessToken` cookie, falling back to `Authorization: Bearer`, and on
//! success stores an [`AuthContext`] in the request extensions.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use platform::client::extract_bearer_token;
use platform::cookie::extract_cookie;

use crate::application::authenticate::{AccessVerifier, AuthContext, TokenSource};
use crate::domain::repository::SessionRepository;
use crate::error::AuthError;

/// Middleware that requires a valid access token
///
/// Use with `axum::middleware::from_fn_with_state(verifier, require_auth::<S>)`.
pub async fn require_auth<S>(
    State(verifier): State<AccessVerifier<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionRepository + Send + Sync + 'static,
{
    let headers = req.headers();
    let (token, source) = match extract_cookie(headers, &verifier.config().access_cookie_name) {
        Some(token) => (Some(token), TokenSource::Cookie),
        None => (extract_bearer_token(headers), TokenSource::BearerHeader),
    };

    let context = verifier.authenticate(token.as_deref(), source).await?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Handlers behind `require_auth` take `AuthContext` as an argument
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}
