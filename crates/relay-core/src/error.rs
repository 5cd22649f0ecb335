//! # Relay Error Types
//!
//! Typed error handling for the order initiation flow.
//! Every step of the flow returns `Result<T, RelayError>`; the HTTP layer
//! turns the error into a response envelope in one place.

use serde_json::Value;
use thiserror::Error;

/// Core error type for the order initiation flow
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (missing credentials, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Wrong HTTP verb on the order endpoint
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    /// Body could not be parsed or a required field is missing
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Request body larger than the handler accepts
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Gateway refused or omitted the session token
    #[error("Failed to obtain sessionToken")]
    SessionAcquisitionFailed { raw: Value },

    /// Gateway payment status was not SUCCESS
    #[error("Payment rejected by gateway (status {status})")]
    PaymentRejected { status: String, raw: Value },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Anything else (missing response fields, unexpected shapes)
    #[error("{0}")]
    Unexpected(String),
}

impl RelayError {
    /// Returns true if the failed call can be attempted again.
    ///
    /// Only transport failures qualify. A gateway that answered with a
    /// refusal will answer the same way a second time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::NetworkError(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MethodNotAllowed { .. } => 405,
            RelayError::MalformedRequest(_) => 400,
            RelayError::PayloadTooLarge { .. } => 413,
            RelayError::SessionAcquisitionFailed { .. } => 400,
            RelayError::PaymentRejected { .. } => 400,
            RelayError::Configuration(_)
            | RelayError::NetworkError(_)
            | RelayError::Serialization(_)
            | RelayError::Unexpected(_) => 500,
        }
    }

    /// Raw gateway payload carried for diagnostics, if any
    pub fn raw_response(&self) -> Option<&Value> {
        match self {
            RelayError::SessionAcquisitionFailed { raw } => Some(raw),
            RelayError::PaymentRejected { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Serialization(err.to_string())
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
