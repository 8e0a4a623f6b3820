//! Sign Up Use Case
//!
//! Creates a new account and its first session.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult, FieldError};

use crate::application::config::AuthConfig;
use crate::application::tokens::issue_token_pair;
use crate::domain::entity::{identity::Identity, session::Session};
use crate::domain::repository::{AccountRegistry, IdentityRepository};
use crate::domain::value_object::{
    credential::TokenPair,
    date_of_birth::DateOfBirth,
    display_name::DisplayName,
    email::Email,
    password::{PasswordHash, RawPassword},
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub display_name: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub date_of_birth: String,
    pub user_agent: Option<String>,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub identity: Identity,
    pub session: Session,
    pub tokens: TokenPair,
}

/// Parsed fields, or every field error at once
struct ValidatedSignUp {
    display_name: DisplayName,
    email: Email,
    user_name: UserName,
    password: RawPassword,
    date_of_birth: DateOfBirth,
}

impl ValidatedSignUp {
    fn parse(input: SignUpInput) -> AuthResult<Self> {
        let mut errors = Vec::new();

        let display_name = collect(
            &mut errors,
            "displayName",
            DisplayName::new(&input.display_name),
        );
        let email = collect(&mut errors, "email", Email::new(input.email));
        let user_name = collect(
            &mut errors,
            "userName",
            UserName::new(&input.user_name).map_err(|e| AppError::bad_request(e.to_string())),
        );
        let password = collect(&mut errors, "password", RawPassword::new(input.password));
        let date_of_birth = collect(
            &mut errors,
            "dateOfBirth",
            DateOfBirth::parse(&input.date_of_birth),
        );

        match (display_name, email, user_name, password, date_of_birth) {
            (Some(display_name), Some(email), Some(user_name), Some(password), Some(date_of_birth))
                if errors.is_empty() =>
            {
                Ok(Self {
                    display_name,
                    email,
                    user_name,
                    password,
                    date_of_birth,
                })
            }
            _ => Err(AuthError::Validation(errors)),
        }
    }
}

fn collect<T>(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    result: AppResult<T>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(FieldError::new(field, e.message().to_string()));
            None
        }
    }
}

/// Sign up use case
pub struct SignUpUseCase<I, R>
where
    I: IdentityRepository,
    R: AccountRegistry,
{
    identity_repo: Arc<I>,
    registry: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<I, R> SignUpUseCase<I, R>
where
    I: IdentityRepository,
    R: AccountRegistry,
{
    pub fn new(identity_repo: Arc<I>, registry: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            identity_repo,
            registry,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let user_agent = input.user_agent.clone();
        let fields = ValidatedSignUp::parse(input)?;

        // Fast path; the store's unique constraints still decide races
        if self.identity_repo.exists_by_email(&fields.email).await?
            || self
                .identity_repo
                .exists_by_user_name(&fields.user_name)
                .await?
        {
            return Err(AuthError::AccountExists);
        }

        let password_hash = PasswordHash::from_raw(&fields.password, self.config.pepper())?;

        let identity = Identity::new(
            fields.display_name,
            fields.email,
            fields.user_name,
            password_hash,
            fields.date_of_birth,
        );
        let session = Session::new(
            identity.identity_id,
            user_agent,
            self.config.session_ttl_chrono(),
        );

        // Sign before persisting so a signing failure leaves nothing behind
        let tokens = issue_token_pair(&self.config, identity.identity_id, session.session_id)?;

        self.registry.register(&identity, &session).await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            user_name = %identity.user_name,
            session_id = %session.session_id,
            "Account created"
        );

        Ok(SignUpOutput {
            identity,
            session,
            tokens,
        })
    }
}
