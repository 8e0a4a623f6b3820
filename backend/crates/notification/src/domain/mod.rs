//! Domain Layer

pub mod entity;
pub mod repository;

pub use entity::{Category, Notification};
pub use repository::NotificationRepository;
