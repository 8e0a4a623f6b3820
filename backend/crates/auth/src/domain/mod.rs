//! Domain Layer
//!
//! Entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{identity::Identity, session::Session};
pub use repository::{AccountRegistry, IdentityRepository, SessionRepository};
pub use value_object::credential::{AccessClaims, RefreshClaims, TokenPair};
