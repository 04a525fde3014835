//! Client options.
//!
//! Timeouts and the secondary discovery host. These are not part of the
//! environment contract; the defaults match the public API.

#![allow(clippy::missing_const_for_fn)]

use std::time::Duration;

/// Default timeout for inference POSTs in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Default timeout for each model-listing GET in milliseconds.
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 15_000;
/// Well-known public host tried after the configured one when listing models.
pub const DEFAULT_DISCOVERY_HOST: &str = "https://api.github.com";
/// Default `max_tokens` for [`generate_text`](super::GitHubModelsClient::generate_text).
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Options for [`GitHubModelsClient`](super::GitHubModelsClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Timeout for inference requests in milliseconds.
    pub request_timeout_ms: u64,
    /// Timeout for each model-listing candidate in milliseconds.
    pub discovery_timeout_ms: u64,
    /// Secondary host for model listing.
    pub discovery_host: String,
}

impl ClientOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inference request timeout in milliseconds.
    #[must_use]
    pub const fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the model-listing timeout in milliseconds.
    #[must_use]
    pub const fn with_discovery_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.discovery_timeout_ms = timeout_ms;
        self
    }

    /// Set the secondary model-listing host.
    #[must_use]
    pub fn with_discovery_host(mut self, host: impl Into<String>) -> Self {
        self.discovery_host = host.into();
        self
    }

    /// Inference request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Model-listing timeout.
    #[must_use]
    pub const fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            discovery_host: DEFAULT_DISCOVERY_HOST.to_string(),
        }
    }
}
