//! Refresh Use Case
//!
//! Trades a refresh token for a new access token. Unlike the gate this
//! always consults the store, so a signed-out session cannot be refreshed.
//! The refresh token itself is not rotated.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{IdentityId, SessionId};

use crate::application::config::AuthConfig;
use crate::application::tokens::{issue_access_token, verify_refresh_token};
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct RefreshOutput {
    pub identity_id: IdentityId,
    pub session_id: SessionId,
    pub access_token: String,
    /// Fixed session horizon; the new access cookie must not outlive it
    pub session_expires_at: DateTime<Utc>,
}

pub struct RefreshUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RefreshUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<RefreshOutput> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let claims = verify_refresh_token(&self.config, token)?;

        let session = self
            .session_repo
            .find_by_id(&claims.session_id)
            .await?
            .ok_or(AuthError::SessionRevoked)?;

        let access_token =
            issue_access_token(&self.config, session.identity_id, session.session_id)?;

        tracing::debug!(
            identity_id = %session.identity_id,
            session_id = %session.session_id,
            "Access token refreshed"
        );

        Ok(RefreshOutput {
            identity_id: session.identity_id,
            session_id: session.session_id,
            access_token,
            session_expires_at: session.expires_at,
        })
    }
}
