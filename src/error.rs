//! Error taxonomy for the marketplace core.
//!
//! `StoreError` is what the persistence adapters report; `AppError` is what
//! services return and what handlers turn into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::types::{ApiResponse, error_codes};

/// Failure reported by a user or book store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("record not found")]
    NotFound,

    #[error("store call timed out after {0} ms")]
    Timeout(u64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Timeouts and lost connections. Worth retrying later, unlike a rejected statement.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::Protocol(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
            _ => false,
        }
    }
}

/// Service-level error. Each variant maps to exactly one HTTP status.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists.")]
    DuplicateEmail,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Invalid or missing token")]
    Unauthenticated,

    #[error("Not allowed to modify this resource")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Service temporarily unavailable")]
    Unavailable(#[source] StoreError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status for this error.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::Validation(_) => error_codes::INVALID_PARAMETER,
            Self::DuplicateEmail => error_codes::DUPLICATE_EMAIL,
            Self::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            Self::Unauthenticated => error_codes::AUTH_FAILED,
            Self::Forbidden => error_codes::FORBIDDEN,
            Self::NotFound(_) => error_codes::NOT_FOUND,
            Self::Unavailable(_) => error_codes::SERVICE_UNAVAILABLE,
            Self::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::NotFound => AppError::NotFound("Record"),
            StoreError::Corrupt(msg) => AppError::Internal(msg),
            transient if transient.is_transient() => AppError::Unavailable(transient),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unavailable(source) => {
                tracing::error!(error = %source, "store unavailable");
            }
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
            }
            AppError::Validation(msg) => {
                tracing::debug!(reason = %msg, "request rejected by validation");
            }
            _ => {}
        }
        // Internal details never reach the client
        let body = ApiResponse::<()>::error(self.code(), self.to_string());
        (self.http_status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status() {
        assert_eq!(
            AppError::Unauthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::DuplicateEmail.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("Book").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::Timeout(5000)).http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_unauthenticated_and_forbidden_are_distinct() {
        assert_ne!(AppError::Unauthenticated.code(), AppError::Forbidden.code());
        assert_ne!(
            AppError::Unauthenticated.http_status(),
            AppError::Forbidden.http_status()
        );
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            AppError::from(StoreError::DuplicateEmail),
            AppError::DuplicateEmail
        ));
        assert!(matches!(
            AppError::from(StoreError::Corrupt("bad json".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_database_errors_split_by_cause() {
        let lost = StoreError::Database(sqlx::Error::PoolTimedOut);
        assert!(matches!(AppError::from(lost), AppError::Unavailable(_)));

        let closed = StoreError::Database(sqlx::Error::PoolClosed);
        assert_eq!(
            AppError::from(closed).http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let rejected = StoreError::Database(sqlx::Error::RowNotFound);
        let err = AppError::from(rejected);
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_detail_not_rendered() {
        let err = AppError::Internal("digest column unreadable".into());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
