//! Error types for the GitHub Models client.
//!
//! This module defines:
//! - [`ClientError`]: everything a client operation can fail with
//! - [`ConfigError`]: configuration problems detected at client construction
//! - [`ProbeFailure`]: the detail of one failed model-listing candidate
//!
//! All errors implement `Send + Sync + Clone`.

use std::fmt;

use thiserror::Error;

/// Maximum number of response-body characters carried by an error.
pub const MAX_ERROR_BODY_CHARS: usize = 1000;

/// Errors returned by [`GitHubModelsClient`](crate::client::GitHubModelsClient).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The configuration cannot be used to build a client.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The API answered with a non-2xx status.
    #[error("HTTP {status} when requesting {url}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// The request URL.
        url: String,
        /// Response body, truncated to [`MAX_ERROR_BODY_CHARS`].
        body: String,
    },

    /// Connection, DNS or body transfer failure.
    #[error("Transport error when requesting {url}: {message}")]
    Transport {
        /// The request URL.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The request did not complete within its timeout.
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// The request URL.
        url: String,
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The request payload could not be built.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// A successful response carried a body that is not JSON.
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse {
        /// The request URL.
        url: String,
        /// Description of the decoding failure.
        message: String,
    },

    /// Every model-listing candidate failed.
    #[error(
        "Could not list models. Tried endpoints: {}{}",
        .tried.join(", "),
        LastFailure(.last_failure.as_ref())
    )]
    Discovery {
        /// Every URL that was tried, in order.
        tried: Vec<String>,
        /// The last failure observed, if any candidate was attempted.
        last_failure: Option<ProbeFailure>,
    },
}

impl ClientError {
    /// Build an [`ClientError::HttpStatus`], truncating the body.
    #[must_use]
    pub fn http_status(status: u16, url: impl Into<String>, body: &str) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
            body: truncate_chars(body, MAX_ERROR_BODY_CHARS),
        }
    }

    /// Returns true for failures below the HTTP layer (connection, DNS, timeout).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// The HTTP status code, if the API answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Why a single model-listing candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The endpoint answered with a non-2xx status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to [`MAX_ERROR_BODY_CHARS`].
        body: String,
    },
    /// The request itself failed.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl ProbeFailure {
    /// Build a [`ProbeFailure::Status`], truncating the body.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: truncate_chars(body, MAX_ERROR_BODY_CHARS),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Error { message } => f.write_str(message),
        }
    }
}

impl From<ClientError> for ProbeFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::HttpStatus { status, body, .. } => Self::Status { status, body },
            other => Self::Error {
                message: other.to_string(),
            },
        }
    }
}

/// Renders the optional suffix of a discovery error.
struct LastFailure<'a>(Option<&'a ProbeFailure>);

impl fmt::Display for LastFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ProbeFailure::Status { status, body }) => {
                write!(f, "; last response {status}: {body}")
            }
            Some(ProbeFailure::Error { message }) => write!(f, "; last error: {message}"),
            None => Ok(()),
        }
    }
}

/// Configuration errors.
///
/// These errors represent configurations that cannot produce a usable client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error(
        "{var} is required (set the env var, enable GITHUB_MODELS_ALLOW_NO_API_KEY for local debugging, or use a .env file)"
    )]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Keep at most `max` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
