//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use crate::sheets::{SheetError, SheetKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A sheet has not been fetched yet
    #[error("The {0} sheet is still loading")]
    SourceLoading(SheetKind),

    /// The last fetch of a sheet failed
    #[error("The {kind} sheet could not be loaded: {message}")]
    SourceFailed { kind: SheetKind, message: String },

    /// Any other sheet error
    #[error("Sheet error: {0}")]
    Sheet(SheetError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::Loading(kind) => ApiError::SourceLoading(kind),
            SheetError::Failed { kind, message } => ApiError::SourceFailed { kind, message },
            other => ApiError::Sheet(other),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::SourceLoading(_) => (StatusCode::SERVICE_UNAVAILABLE, "SOURCE_LOADING"),
            ApiError::SourceFailed { .. } => (StatusCode::BAD_GATEWAY, "SOURCE_FAILED"),
            ApiError::Sheet(SheetError::Config(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            ApiError::Sheet(SheetError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, "SOURCE_TIMEOUT"),
            ApiError::Sheet(_) => (StatusCode::BAD_GATEWAY, "SHEET_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        // Loading is routine right after startup
        if matches!(self, ApiError::SourceLoading(_)) {
            tracing::debug!(request_id = %request_id, error_code = %code, "Sheets not loaded yet");
        } else {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_error_mapping() {
        let err: ApiError = SheetError::Loading(SheetKind::Revenue).into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::SERVICE_UNAVAILABLE, "SOURCE_LOADING")
        );

        let err: ApiError = SheetError::Failed {
            kind: SheetKind::Transactions,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "SOURCE_FAILED"));

        let err: ApiError = SheetError::Timeout.into();
        assert_eq!(err.status_and_code().0, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_validation_response_status() {
        let response = ApiError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
