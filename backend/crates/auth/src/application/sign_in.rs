//! Sign In Use Case
//!
//! Checks email + password and opens a new session. Every sign-in gets
//! its own session, so concurrent sign-ins never share one.

use std::sync::Arc;

use kernel::id::{IdentityId, SessionId};

use crate::application::config::AuthConfig;
use crate::application::tokens::issue_token_pair;
use crate::domain::entity::session::Session;
use crate::domain::repository::{IdentityRepository, SessionRepository};
use crate::domain::value_object::{credential::TokenPair, email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub identity_id: IdentityId,
    pub session_id: SessionId,
    pub tokens: TokenPair,
}

/// Sign in use case
pub struct SignInUseCase<I, S>
where
    I: IdentityRepository,
    S: SessionRepository,
{
    identity_repo: Arc<I>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<I, S> SignInUseCase<I, S>
where
    I: IdentityRepository,
    S: SessionRepository,
{
    pub fn new(identity_repo: Arc<I>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            identity_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Unknown email and wrong password are indistinguishable to the caller
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self
            .identity_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = RawPassword::for_sign_in(input.password);
        if !identity
            .password_hash
            .verify(&password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::new(
            identity.identity_id,
            input.user_agent,
            self.config.session_ttl_chrono(),
        );
        let tokens = issue_token_pair(&self.config, identity.identity_id, session.session_id)?;

        self.session_repo.create(&session).await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            session_id = %session.session_id,
            "Signed in"
        );

        Ok(SignInOutput {
            identity_id: identity.identity_id,
            session_id: session.session_id,
            tokens,
        })
    }
}
