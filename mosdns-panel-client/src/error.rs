use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all panel backend operations.
///
/// Each variant includes an `endpoint` field identifying which API call produced
/// the error, plus variant-specific context. All variants are serializable for
/// structured error reporting.
///
/// None of these errors are retried by the client: the panel surfaces every
/// failure to the operator and waits for an explicit re-trigger.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BackendError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("[{endpoint}] Network error: {detail}")]
    NetworkError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("[{endpoint}] Request timeout: {detail}")]
    Timeout {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The backend answered with a non-success HTTP status.
    ///
    /// `message` carries the `error`/`message` field extracted from the JSON
    /// body when present, otherwise the HTTP status line.
    #[error("[{endpoint}] HTTP {status}: {message}")]
    HttpStatus {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Human-readable error message.
        message: String,
    },

    /// Failed to parse the backend's response body.
    #[error("[{endpoint}] Parse error: {detail}")]
    ParseError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("[{endpoint}] Serialization error: {detail}")]
    SerializationError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the serialization failure.
        detail: String,
    },
}

impl BackendError {
    /// Whether the error reflects expected operator-facing conditions
    /// (bad input, missing resource) rather than an infrastructure fault.
    /// Used for log level selection: `warn` when `true`, `error` otherwise.
    ///
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::HttpStatus { status, .. } if (400..500).contains(status))
    }

    /// The endpoint the failed request was addressed to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::NetworkError { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::HttpStatus { endpoint, .. }
            | Self::ParseError { endpoint, .. }
            | Self::SerializationError { endpoint, .. } => endpoint,
        }
    }
}

/// Convenience type alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;
