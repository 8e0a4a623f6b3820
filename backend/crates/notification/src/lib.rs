//! Notification Backend Module
//!
//! Persists notifications addressed to an identity and pushes each new one
//! to the recipient's live realtime connection, if there is one.
//!
//! - `domain/` - Notification entity and repository trait
//! - `application/` - Notification service (create, list, mark read)
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers and router (gated)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::service::{CreateNotification, NotificationService};
pub use domain::entity::{Category, Notification};
pub use error::{NotificationError, NotificationResult};
pub use infra::memory::InMemoryNotificationRepository;
pub use infra::postgres::PgNotificationRepository;
pub use presentation::router::notification_router;
