//! Error types for the Lector SDK.

use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Connection error (network, DNS, refused, reset)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The HTTP layer gave up waiting
    #[error("Request timeout")]
    Timeout,

    /// Non-success status on an endpoint that has no failure body contract
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Http {
        /// Status code
        status: u16,
        /// Best available message from the body
        message: Option<String>,
    },

    /// Response body could not be read or parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Request could not be built (bad URL, bad MIME type)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Timeout
        } else if e.is_connect() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_builder() {
            SdkError::InvalidRequest(e.to_string())
        } else if e.is_decode() || e.is_body() {
            SdkError::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            SdkError::Http {
                status: status.as_u16(),
                message: None,
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::MalformedResponse(format!("JSON parsing error: {}", e))
    }
}
