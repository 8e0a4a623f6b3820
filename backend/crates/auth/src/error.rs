//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::app_error::{AppError, FieldError};
use kernel::error::kind::ErrorKind;
use platform::password::PasswordHashError;
use platform::token::{TokenError, VerificationError};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Error codes clients branch on
pub mod codes {
    pub const NO_TOKEN: &str = "NO_TOKEN";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const SESSION_REVOKED: &str = "SESSION_REVOKED";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const ACCOUNT_EXISTS: &str = "ACCOUNT_EXISTS";
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Request fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Request body could not be parsed
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Email or user name already registered
    #[error("An account with these details already exists")]
    AccountExists,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No access token on the request
    #[error("No token provided")]
    MissingToken,

    /// Correctly signed but past its expiry
    #[error("Token expired")]
    TokenExpired,

    /// Any other verification failure
    #[error("Invalid token")]
    InvalidToken,

    /// Token verified but its session no longer exists
    #[error("Session expired")]
    SessionRevoked,

    /// Authenticated identity no longer exists
    #[error("Identity not found")]
    IdentityNotFound,

    /// Token signing failed (configuration problem)
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Password hashing failed
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::MalformedBody(_) => ErrorKind::BadRequest,
            AuthError::AccountExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::SessionRevoked => ErrorKind::Unauthorized,
            AuthError::IdentityNotFound => ErrorKind::NotFound,
            AuthError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::Database(_) => ErrorKind::InternalServerError,
            AuthError::Token(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Machine-readable code, when the variant has a more specific one
    /// than its kind
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AuthError::MissingToken => Some(codes::NO_TOKEN),
            AuthError::TokenExpired => Some(codes::TOKEN_EXPIRED),
            AuthError::InvalidToken => Some(codes::INVALID_TOKEN),
            AuthError::SessionRevoked => Some(codes::SESSION_REVOKED),
            AuthError::InvalidCredentials => Some(codes::INVALID_CREDENTIALS),
            AuthError::AccountExists => Some(codes::ACCOUNT_EXISTS),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        let code = self.code();
        let mut app = match self {
            AuthError::Validation(errors) => AppError::validation(errors),
            AuthError::Database(e) => AppError::from(e),
            AuthError::AccountExists => AppError::conflict(AuthError::AccountExists.to_string())
                .with_action("Sign in instead, or use a different email and user name"),
            AuthError::TokenExpired => {
                AppError::new(ErrorKind::Unauthorized, "Token expired")
                    .with_action("Refresh the session or sign in again")
            }
            other => AppError::new(other.kind(), other.to_string()),
        };
        if let Some(code) = code {
            app = app.with_code(code);
        }
        app
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token signing failed");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

/// The one verification policy every transport shares
impl From<VerificationError> for AuthError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Expired => AuthError::TokenExpired,
            VerificationError::Malformed
            | VerificationError::SignatureMismatch
            | VerificationError::AudienceMismatch => AuthError::InvalidToken,
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
