//! Sign Out Use Case
//!
//! Deletes the session named by the access token. Clearing cookies is the
//! handler's job and happens whether or not this succeeds.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::verify_access_token;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Returns whether a session was deleted. Expired tokens are rejected.
    pub async fn execute(&self, access_token: &str) -> AuthResult<bool> {
        let claims = verify_access_token(&self.config, access_token)?;
        let deleted = self.session_repo.delete_by_id(&claims.session_id).await?;

        tracing::info!(
            identity_id = %claims.user_id,
            session_id = %claims.session_id,
            deleted,
            "Signed out"
        );

        Ok(deleted)
    }
}
