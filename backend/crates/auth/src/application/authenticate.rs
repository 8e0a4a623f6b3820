//! Request Authentication
//!
//! The single verification policy behind every transport: HTTP cookie,
//! `Authorization: Bearer` header, and the realtime handshake payload.
//!
//! - no token: `MissingToken` ("No token provided")
//! - expired: `TokenExpired` ("Token expired")
//! - anything else: `InvalidToken` ("Invalid token")
//!
//! By default the check is stateless, so a deleted session stays usable
//! until its access token expires (at most the access TTL). With
//! `strict_session_check` the session must also still exist.

use std::fmt;
use std::sync::Arc;

use kernel::id::{IdentityId, SessionId};

use crate::application::config::AuthConfig;
use crate::application::tokens::verify_access_token;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// Where a presented token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cookie,
    BearerHeader,
    Handshake,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenSource::Cookie => "cookie",
            TokenSource::BearerHeader => "bearer",
            TokenSource::Handshake => "handshake",
        })
    }
}

/// Who is calling, bound onto the request or connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub identity_id: IdentityId,
    pub session_id: SessionId,
}

/// Verifies access tokens for the gates
pub struct AccessVerifier<S>
where
    S: SessionRepository,
{
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> Clone for AccessVerifier<S>
where
    S: SessionRepository,
{
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S> AccessVerifier<S>
where
    S: SessionRepository,
{
    pub fn new(sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { sessions, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub async fn authenticate(
        &self,
        token: Option<&str>,
        source: TokenSource,
    ) -> AuthResult<AuthContext> {
        let context = verify_presented_token(&self.config, token).inspect_err(|e| {
            tracing::debug!(source = %source, reason = %e, "Access token rejected");
        })?;

        if self.config.strict_session_check
            && self.sessions.find_by_id(&context.session_id).await?.is_none()
        {
            tracing::debug!(
                source = %source,
                session_id = %context.session_id,
                "Access token references a revoked session"
            );
            return Err(AuthError::SessionRevoked);
        }

        Ok(context)
    }
}

/// Stateless half of the policy
pub fn verify_presented_token(config: &AuthConfig, token: Option<&str>) -> AuthResult<AuthContext> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = verify_access_token(config, token)?;

    Ok(AuthContext {
        identity_id: claims.user_id,
        session_id: claims.session_id,
    })
}
