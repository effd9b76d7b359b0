//! Error types for the exo client

use serde_json::Value;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the exo client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received, or its body could not be read
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// A successful response did not carry the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server rejected the call with a `{"message": ...}` payload
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the server
        message: String,
    },

    /// The server rejected the call without a usable error payload
    #[error("malformed error from server: {0}")]
    MalformedResponse(String),

    /// Client configuration was rejected before any request was made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is a client error (4xx status)
    ///
    /// Client errors are user-correctable (bad input, unknown workspace);
    /// anything else is infrastructural.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

/// Classify an HTTP exchange by status and body text
///
/// Returns `None` for any 2xx status. Otherwise the body is parsed as JSON
/// (falling back to the raw text) and turned into [`ClientError::Api`] when
/// it has a string `message` field, or [`ClientError::MalformedResponse`]
/// carrying the JSON rendering of the payload.
pub fn response_to_error(status: u16, body: &str) -> Option<ClientError> {
    if (200..300).contains(&status) {
        return None;
    }

    let payload: Value =
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));

    match payload.get("message").and_then(Value::as_str) {
        Some(message) => Some(ClientError::api_error(status, message)),
        None => Some(ClientError::MalformedResponse(payload.to_string())),
    }
}
