//! Current Identity Use Case

use std::sync::Arc;

use crate::application::authenticate::AuthContext;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::error::{AuthError, AuthResult};

/// Loads the account behind an authenticated request
pub struct CurrentIdentityUseCase<I>
where
    I: IdentityRepository,
{
    identity_repo: Arc<I>,
}

impl<I> CurrentIdentityUseCase<I>
where
    I: IdentityRepository,
{
    pub fn new(identity_repo: Arc<I>) -> Self {
        Self { identity_repo }
    }

    pub async fn execute(&self, context: &AuthContext) -> AuthResult<Identity> {
        self.identity_repo
            .find_by_id(&context.identity_id)
            .await?
            .ok_or(AuthError::IdentityNotFound)
    }
}
