//! Application Error
//!
//! [`AppError`] is what every handler finally renders: a kind (status),
//! a client-facing message and `errorCode`, an optional hint, per-field
//! validation errors, and a server-side source that never leaves the
//! process.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde::Serialize;

use super::kind::ErrorKind;

/// One rejected input field, rendered into the `errors` array of a 400
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON key of the request field
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified application error
///
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::unauthorized("Token expired")
///     .with_code("TOKEN_EXPIRED")
///     .with_action("Refresh the session or sign in again");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.code(), "TOKEN_EXPIRED");
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    code: Option<Cow<'static, str>>,
    action: Option<Cow<'static, str>>,
    field_errors: Vec<FieldError>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            action: None,
            field_errors: Vec::new(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 400 with `errorCode` `VALIDATION_ERROR` and the given field errors
    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        Self {
            field_errors,
            ..Self::new(ErrorKind::BadRequest, "Validation failed").with_code("VALIDATION_ERROR")
        }
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Override the kind's default `errorCode`
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// What the client should do next
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Keep the underlying error for logs; it is never rendered
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or(self.kind.code())
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("code", &self.code());
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if !self.field_errors.is_empty() {
            builder.field("field_errors", &self.field_errors);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_code_follows_kind() {
        let err = AppError::not_found("Identity not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Identity not found");
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.action().is_none());
    }

    #[test]
    fn test_with_code_overrides_default() {
        let err = AppError::unauthorized("No token provided").with_code("NO_TOKEN");
        assert_eq!(err.code(), "NO_TOKEN");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_validation_carries_field_errors() {
        let err = AppError::validation(vec![
            FieldError::new("email", "Invalid email format"),
            FieldError::new("password", "Password is too short"),
        ]);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.field_errors().len(), 2);
        assert_eq!(err.field_errors()[0].field, "email");
    }

    #[test]
    fn test_source_is_kept() {
        let db_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = AppError::service_unavailable("Database unavailable").with_source(db_err);
        assert!(err.source().is_some());
        assert!(format!("{err:?}").contains("refused"));
    }

    #[test]
    fn test_display() {
        let err = AppError::conflict("An account with these details already exists");
        assert_eq!(
            err.to_string(),
            "[Conflict] An account with these details already exists"
        );
    }
}
