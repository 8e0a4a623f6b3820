//! Error Kind
//!
//! The coarse classification every domain error collapses into. One kind
//! is one HTTP status.

use std::fmt;

use serde::Serialize;

/// Error taxonomy shared by the auth and notification crates
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
/// assert_eq!(ErrorKind::Conflict.code(), "CONFLICT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Bad input, including per-field validation failures
    BadRequest,
    /// Missing, expired or otherwise unusable credentials
    Unauthorized,
    NotFound,
    /// Duplicate account and similar state clashes
    Conflict,
    InternalServerError,
    /// Database pool exhausted or unreachable
    ServiceUnavailable,
}

impl ErrorKind {
    /// (status, reason phrase, default `errorCode`)
    const fn parts(&self) -> (u16, &'static str, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request", "BAD_REQUEST"),
            ErrorKind::Unauthorized => (401, "Unauthorized", "UNAUTHORIZED"),
            ErrorKind::NotFound => (404, "Not Found", "NOT_FOUND"),
            ErrorKind::Conflict => (409, "Conflict", "CONFLICT"),
            ErrorKind::InternalServerError => {
                (500, "Internal Server Error", "INTERNAL_SERVER_ERROR")
            }
            ErrorKind::ServiceUnavailable => (503, "Service Unavailable", "SERVICE_UNAVAILABLE"),
        }
    }

    pub const fn status_code(&self) -> u16 {
        self.parts().0
    }

    /// Standard reason phrase; also the public message of 5xx responses
    pub const fn as_str(&self) -> &'static str {
        self.parts().1
    }

    /// Default `errorCode`, overridden per error with
    /// [`AppError::with_code`](super::app_error::AppError::with_code)
    pub const fn code(&self) -> &'static str {
        self.parts().2
    }

    /// 5xx: logged, and detail is hidden from the client
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
