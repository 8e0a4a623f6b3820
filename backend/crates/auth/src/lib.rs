//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token policy, configuration
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, cookies, gate, router
//!
//! ## Features
//! - Sign-up / sign-in with email + password
//! - Short-lived access tokens and long-lived refresh tokens, both bound
//!   to a server-side session and carried in HttpOnly cookies
//! - One verification policy shared by HTTP and realtime transports
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Access and refresh tokens signed with separate secrets
//! - Revocation: sign-out deletes the session; refresh always checks it,
//!   the gate only in strict mode

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::authenticate::{AccessVerifier, AuthContext, TokenSource};
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::{identity::Identity, session::Session};
    pub use crate::domain::value_object::credential::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryAuthRepository as MemoryAuthStore;
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
