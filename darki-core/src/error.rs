//! Error types for darki.
//!
//! A single error hierarchy built with `thiserror`. Note that the link
//! resolver never surfaces these to its caller: they only travel between the
//! transports and the code that decides to fall back.

use thiserror::Error;

/// Result type alias using `DarkiError`.
pub type Result<T> = std::result::Result<T, DarkiError>;

/// Main error type for all darki operations.
#[derive(Debug, Error)]
pub enum DarkiError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A required request parameter is missing.
    #[error("Parameter \"{0}\" is required")]
    MissingParameter(String),

    /// A request parameter could not be parsed.
    #[error("Invalid value for parameter \"{name}\": {value}")]
    InvalidParameter { name: String, value: String },

    /// Unknown media type.
    #[error("Unknown media type: {0}")]
    UnknownMediaType(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Connection or request timeout.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream {url} returned HTTP {status}")]
    UpstreamStatus { status: u16, url: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // DEBRID ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The debrid API reported a request-level error.
    #[error("Debrid API error {code}: {message}")]
    DebridApiError { code: String, message: String },

    /// The debrid API answered with something we could not understand.
    #[error("Unexpected debrid response: {0}")]
    DebridUnexpectedResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SOURCE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The release source failed to produce candidates.
    #[error("Release source failed: {0}")]
    SourceError(String),
}

impl DarkiError {
    /// Returns true for transport-level failures (timeouts, refused connections).
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DarkiError::HttpError(_) | DarkiError::ConnectionTimeout(_)
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DarkiError::ValidationError(_)
                | DarkiError::MissingParameter(_)
                | DarkiError::InvalidParameter { .. }
                | DarkiError::UnknownMediaType(_)
        )
    }
}
