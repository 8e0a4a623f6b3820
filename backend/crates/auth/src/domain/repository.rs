//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer (PostgreSQL and in-memory).

use kernel::id::{IdentityId, SessionId};

use crate::domain::entity::{identity::Identity, session::Session};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// Identity repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Compared on the canonical form
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Expired sessions are reported as absent
    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<Session>>;

    /// Returns whether a session was removed
    async fn delete_by_id(&self, session_id: &SessionId) -> AuthResult<bool>;

    /// Clean up expired sessions
    async fn delete_expired(&self) -> AuthResult<u64>;
}

/// Account creation as one unit of work
#[trait_variant::make(AccountRegistry: Send)]
pub trait LocalAccountRegistry {
    /// Persist a new identity together with its first session.
    ///
    /// Either both records are stored or neither is. A duplicate email or
    /// user name fails with `AuthError::AccountExists`.
    async fn register(&self, identity: &Identity, session: &Session) -> AuthResult<()>;
}
