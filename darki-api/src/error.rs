//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use darki_core::error::DarkiError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Duplicate search in flight.
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message, "SEARCH_IN_PROGRESS")
    }

    /// The release source failed.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message, "UPSTREAM_ERROR")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error response body. `success` keeps media-manager clients that only
/// look at that flag working.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<DarkiError> for ApiError {
    fn from(err: DarkiError) -> Self {
        match &err {
            DarkiError::ValidationError(_)
            | DarkiError::MissingParameter(_)
            | DarkiError::InvalidParameter { .. }
            | DarkiError::UnknownMediaType(_) => ApiError::bad_request(err.to_string()),
            DarkiError::HttpError(_)
            | DarkiError::ConnectionTimeout(_)
            | DarkiError::UpstreamStatus { .. }
            | DarkiError::SourceError(_) => {
                tracing::warn!(error = %err, "Release source failed");
                ApiError::bad_gateway(err.to_string())
            }
            DarkiError::DebridApiError { .. } | DarkiError::DebridUnexpectedResponse(_) => {
                tracing::error!(error = %err, "Internal error");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}
