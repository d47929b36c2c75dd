//! API error types.

use akwaaba_core::CoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type for consistent error responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("{0}")]
    BadRequest(String),

    /// Input failed validation; every problem is listed.
    #[error("Please correct the highlighted fields")]
    Validation(Vec<String>),

    /// Missing or invalid session.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// Conflict with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            CoreError::Validation(details) => ApiError::Validation(details),
            CoreError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            CoreError::Forbidden(msg) => ApiError::Forbidden(msg),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::SoldOut { .. } => ApiError::Conflict(err.to_string()),
            CoreError::SalesClosed
            | CoreError::InvalidQuantity(_)
            | CoreError::AmountMismatch { .. } => ApiError::BadRequest(err.to_string()),
            CoreError::Persistence(_)
            | CoreError::LockPoisoned(_)
            | CoreError::PasswordHash(_)
            | CoreError::Export(_) => {
                error!(error = %err, "Request failed");
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("test".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("test".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Conflict("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::SoldOut { available: 2 }.into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "only 2 ticket(s) left");

        let err: ApiError = CoreError::SalesClosed.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = CoreError::AmountMismatch {
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = CoreError::not_found("event").into();
        assert_eq!(err.to_string(), "event not found");

        let err: ApiError = CoreError::LockPoisoned("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal error");
    }

    #[test]
    fn test_validation_display() {
        let err = ApiError::Validation(vec!["Title is required".to_string()]);
        assert_eq!(err.to_string(), "Please correct the highlighted fields");
    }
}
