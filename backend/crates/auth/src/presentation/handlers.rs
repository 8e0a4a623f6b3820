//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::client::{extract_bearer_token, extract_user_agent};
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthContext, CurrentIdentityUseCase, RefreshUseCase, SignInInput, SignInUseCase,
    SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{AccountRegistry, IdentityRepository, SessionRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::cookies;
use crate::presentation::dto::{IdentityResponse, MessageResponse, SignInRequest, SignUpRequest};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::MalformedBody(rejection.body_text()))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = SignUpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            display_name: req.display_name,
            email: req.email,
            user_name: req.user_name,
            password: req.password,
            date_of_birth: req.date_of_birth,
            user_agent: extract_user_agent(&headers),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        cookies::attach(&state.config, &output.tokens),
        Json(IdentityResponse::from(&output.identity)),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
            user_agent: extract_user_agent(&headers),
        })
        .await?;

    Ok((
        StatusCode::OK,
        cookies::attach(&state.config, &output.tokens),
        Json(MessageResponse::new("Signed in")),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /auth/signout
///
/// Always clears both cookies; deleting the session is best-effort.
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.access_cookie_name)
        .or_else(|| extract_bearer_token(&headers));

    if let Some(token) = token {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign-out without session deletion");
        }
    }

    (
        StatusCode::OK,
        cookies::clear(&state.config),
        Json(MessageResponse::new("Signed out")),
    )
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.refresh_cookie_name);

    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(token.as_deref()).await?;

    Ok((
        StatusCode::OK,
        cookies::attach_access(
            &state.config,
            &output.access_token,
            output.session_expires_at,
        ),
        Json(MessageResponse::new("Token refreshed")),
    ))
}

// ============================================================================
// Current Identity (requires authentication)
// ============================================================================

/// GET /auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    context: AuthContext,
) -> AuthResult<Json<IdentityResponse>>
where
    R: IdentityRepository + SessionRepository + AccountRegistry + Clone + Send + Sync + 'static,
{
    let identity = CurrentIdentityUseCase::new(state.repo.clone())
        .execute(&context)
        .await?;

    Ok(Json(IdentityResponse::from(&identity)))
}
