//! Notification Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::app_error::{AppError, FieldError};
use kernel::error::kind::ErrorKind;
use thiserror::Error;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// Input fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Stored category is not one we know
    #[error("Unknown notification category: {0}")]
    UnknownCategory(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl NotificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotificationError::Validation(_) => ErrorKind::BadRequest,
            NotificationError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => {
                ErrorKind::ServiceUnavailable
            }
            NotificationError::Database(_) | NotificationError::UnknownCategory(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            NotificationError::Validation(errors) => AppError::validation(errors),
            NotificationError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            NotificationError::Database(e) => {
                tracing::error!(error = %e, "Notification database error");
            }
            NotificationError::UnknownCategory(category) => {
                tracing::error!(category = %category, "Corrupt notification row");
            }
            NotificationError::Validation(_) => {
                tracing::debug!(error = %self, "Notification rejected");
            }
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
