//! Error types for the SonarQube client.
//!
//! # Design
//! Non-success HTTP statuses are not errors here: they come back as
//! `Outcome::failure`. What remains are the conditions a caller cannot
//! handle by inspecting a status code: a bad configuration, a cancelled or
//! timed-out call, a transport fault, and a 2xx body that does not decode.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::http::BoxError;

/// Rejected client configuration, raised at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("request_timeout: doesn't expect a zero timeout")]
    InvalidTimeout,

    #[error("server_url: {url} cannot be used as a base address")]
    InvalidServerUrl { url: String },

    #[error("server_url: {0}")]
    UnparsableServerUrl(#[from] url::ParseError),

    #[error("environment variable {name} is not set")]
    MissingVariable { name: &'static str },

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ConfigError {
    /// Name of the offending constructor parameter or setting.
    pub fn parameter(&self) -> &'static str {
        match self {
            ConfigError::InvalidTimeout => "request_timeout",
            ConfigError::InvalidServerUrl { .. } | ConfigError::UnparsableServerUrl(_) => "server_url",
            ConfigError::MissingVariable { name } => *name,
            ConfigError::Transport(_) => "transport",
        }
    }
}

/// Why an in-flight call was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    Caller,
    /// The client's request timeout elapsed first.
    Timeout(Duration),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Caller => write!(f, "cancelled by caller"),
            CancelReason::Timeout(after) => write!(f, "timed out after {after:?}"),
        }
    }
}

/// The body of a 2xx response could not be turned into the endpoint's type.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid protobuf stream: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("expected an XML document: {0}")]
    NotXml(&'static str),
}

/// Errors returned by `SonarQubeClient` endpoint methods.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request {0}")]
    Cancelled(CancelReason),

    /// The transport failed below HTTP semantics. The fault is carried as-is.
    #[error(transparent)]
    Transport(BoxError),

    #[error("failed to decode {endpoint} response (HTTP {status}): {source}")]
    Decode {
        endpoint: &'static str,
        status: u16,
        #[source]
        source: DecodeError,
    },

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("client has been closed")]
    Closed,
}

impl ClientError {
    /// True for both caller cancellation and timeout.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Cancelled(CancelReason::Timeout(_)))
    }

    /// Hands back the original transport fault, if that is what this is.
    pub fn into_transport_fault(self) -> Option<BoxError> {
        match self {
            ClientError::Transport(fault) => Some(fault),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_parameter() {
        let err = ConfigError::InvalidTimeout;
        assert_eq!(err.parameter(), "request_timeout");
        assert!(err.to_string().starts_with("request_timeout"));
    }

    #[test]
    fn transport_fault_displays_unchanged() {
        let fault: BoxError = "foo text.".into();
        let err = ClientError::Transport(fault);
        assert_eq!(err.to_string(), "foo text.");
        assert_eq!(err.into_transport_fault().unwrap().to_string(), "foo text.");
    }

    #[test]
    fn timeout_is_a_cancellation() {
        let err = ClientError::Cancelled(CancelReason::Timeout(Duration::from_secs(2)));
        assert!(err.is_cancelled());
        assert!(err.is_timeout());
        assert!(!ClientError::Cancelled(CancelReason::Caller).is_timeout());
        assert_eq!(err.to_string(), "request timed out after 2s");
    }
}
