//! Error Conversions
//!
//! Database errors into [`AppError`], and [`AppError`] into the JSON error
//! body `{message, errorCode, status, action?, errors?}`.

#[cfg(any(feature = "sqlx", feature = "axum"))]
use super::app_error::AppError;

/// Map a database error onto the taxonomy. The driver error is kept as
/// the source; only the generic message reaches clients.
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let mapped = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable")
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                Some("23505") => AppError::conflict("Duplicate key value"),
                Some("23503") => AppError::conflict("Referenced record does not exist"),
                Some("23502" | "23514") => AppError::bad_request("Constraint violation"),
                // Class 53 (insufficient resources), 57 (operator intervention)
                Some(code) if code.starts_with("53") || code.starts_with("57") => {
                    AppError::service_unavailable("Database unavailable")
                }
                _ => AppError::internal("Database error"),
            },
            _ => AppError::internal("Database error"),
        };
        mapped.with_source(err)
    }
}

#[cfg(feature = "axum")]
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    message: &'a str,
    error_code: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a str>,
    #[serde(skip_serializing_if = "no_field_errors")]
    errors: &'a [super::app_error::FieldError],
}

#[cfg(feature = "axum")]
fn no_field_errors(errors: &&[super::app_error::FieldError]) -> bool {
    errors.is_empty()
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 5xx: the message never carries internals, the source stays server-side
        let message = if self.is_server_error() {
            self.kind().as_str()
        } else {
            self.message()
        };

        let body = ErrorBody {
            message,
            error_code: self.code(),
            status: self.status_code(),
            action: self.action(),
            errors: self.field_errors(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use crate::error::app_error::FieldError;
    use axum::response::IntoResponse;

    #[test]
    fn test_unauthorized_status() {
        let response = AppError::unauthorized("No token provided")
            .with_code("NO_TOKEN")
            .into_response();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_status() {
        let response =
            AppError::validation(vec![FieldError::new("email", "required")]).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_status() {
        let response = AppError::internal("pool exploded").into_response();
        assert_eq!(
            response.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
