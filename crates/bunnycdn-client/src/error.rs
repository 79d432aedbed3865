//! Client error types
//!
//! [`ClientError`] is a hard failure raised before (or instead of) talking
//! to the provider. [`ApiFailure`] describes a remote outcome and is handed
//! back as data.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Result type alias for hard failures
pub type Result<T> = std::result::Result<T, ClientError>;

/// Result type alias for remote outcomes
pub type ApiResult<T> = std::result::Result<T, ApiFailure>;

/// Local failures: misuse of the API or the local filesystem
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required argument is missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote failures, returned as data rather than raised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The provider answered with a non-2xx status
    #[error("HTTP {http_status}: {message}")]
    Status { http_status: u16, message: String },

    /// No response was received (DNS, TCP, TLS, timeout, broken stream)
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A 2xx response carried a body that does not match the expected shape
    #[error("invalid response body (HTTP {http_status}): {message}")]
    InvalidBody { http_status: u16, message: String },
}

impl ApiFailure {
    /// The observed HTTP status, if a response was received at all
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { http_status, .. } | Self::InvalidBody { http_status, .. } => {
                Some(*http_status)
            }
            Self::Transport { .. } => None,
        }
    }

    /// Human readable failure message
    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. }
            | Self::Transport { message }
            | Self::InvalidBody { message, .. } => message,
        }
    }

    /// Check if the provider reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    /// Check if the provider rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.http_status(), Some(401) | Some(403))
    }

    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

impl Serialize for ApiFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiFailure", 3)?;
        state.serialize_field("status", "error")?;
        state.serialize_field("http_status", &self.http_status())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_failure_envelope() {
        let failure = ApiFailure::Status {
            http_status: 404,
            message: "Not Found".to_string(),
        };

        assert!(failure.is_not_found());
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"status": "error", "http_status": 404, "message": "Not Found"})
        );
    }

    #[test]
    fn test_transport_failure_has_no_status() {
        let failure = ApiFailure::transport("connection refused");

        assert_eq!(failure.http_status(), None);
        assert!(!failure.is_not_found());
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"status": "error", "http_status": null, "message": "connection refused"})
        );
    }
}
