//! Error types for Databricks operations.
//!
//! Every failure is returned to the immediate caller. Errors fall into four
//! classes: local validation failures raised before any request is sent,
//! transport failures where no response was obtained, remote failures carrying
//! a non-2xx status, and decode failures of a successful response body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Databricks operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Caller-supplied parameters were rejected locally; nothing was sent
    #[error("Invalid parameters: {0}")]
    Validation(String),

    /// The transport could not complete the exchange
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The exchange completed but the server returned a non-2xx status
    #[error("Failed to return a 2XX response ({status}): {body}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Response body, read for diagnostics
        body: String,
    },

    /// A successful response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A request value could not be encoded
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// The request URL could not be built
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Client construction or configuration failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A job run reported an error instead of output
    #[error("Run output unavailable: {0}")]
    RunOutput(String),
}

/// Failures raised by a [`Transport`](crate::transport::Transport) before a
/// response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// A connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The exchange was cancelled before completing
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Credentials could not be resolved for the request
    #[error("Failed to resolve credentials: {0}")]
    Credentials(String),

    /// Any other request failure
    #[error("HTTP request failed: {0}")]
    Request(String),
}

/// Specialized result type for Databricks operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the Databricks REST API on failure.
///
/// Only used for diagnostics; the body of a failed response is never decoded
/// into an operation's result type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Machine readable error code, e.g. `RESOURCE_DOES_NOT_EXIST`
    #[serde(default)]
    pub error_code: String,
    /// Human readable message
    #[serde(default)]
    pub message: String,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::Config(_) => "CONFIG_ERROR",
            Self::RunOutput(_) => "RUN_OUTPUT_ERROR",
        }
    }

    /// Returns the HTTP status for remote failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Attempts to parse the Databricks error body of a remote failure.
    #[must_use]
    pub fn api_error(&self) -> Option<ApiErrorBody> {
        match self {
            Self::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Returns true if no response was obtained from the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// Conversions from external error types
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64 content: {err}"))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            Error::Transport(TransportError::Connect("refused".to_string())).error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(
            Error::Api {
                status: 500,
                body: String::new()
            }
            .error_code(),
            "API_ERROR"
        );
        assert_eq!(Error::Decode("test".to_string()).error_code(), "DECODE_ERROR");
        assert_eq!(Error::Encode("test".to_string()).error_code(), "ENCODE_ERROR");
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(Error::Config("test".to_string()).error_code(), "CONFIG_ERROR");
        assert_eq!(
            Error::RunOutput("test".to_string()).error_code(),
            "RUN_OUTPUT_ERROR"
        );
    }

    #[test]
    fn test_api_error_display_embeds_status_and_body() {
        let err = Error::Api {
            status: 418,
            body: "{'error':'expected'}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to return a 2XX response (418): {'error':'expected'}"
        );
        assert_eq!(err.status(), Some(418));
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let inner = TransportError::Timeout("deadline elapsed".to_string());
        let err: Error = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error_body_parsing() {
        let err = Error::Api {
            status: 404,
            body: r#"{"error_code":"RESOURCE_DOES_NOT_EXIST","message":"No file at /foo"}"#
                .to_string(),
        };
        let body = err.api_error().unwrap();
        assert_eq!(body.error_code, "RESOURCE_DOES_NOT_EXIST");
        assert_eq!(body.message, "No file at /foo");

        let err = Error::Api {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert!(err.api_error().is_none());
        assert!(Error::Decode("x".to_string()).api_error().is_none());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::Decode(_)));
    }

    #[test]
    fn test_from_base64_error() {
        use base64::Engine;
        let err = base64::engine::general_purpose::STANDARD
            .decode("***")
            .unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::Decode(_)));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::Validation("test".to_string());
        let err2 = Error::Validation("test".to_string());
        let err3 = Error::Validation("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
