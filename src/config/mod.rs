//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Default value handling
//! - API style selection via [`ApiStyle`]
//! - Secure API key storage via [`SecretString`]
//!
//! Resolution never fails. Whether a configuration is usable is decided when
//! the client is constructed.
//!
//! # Example
//!
//! ```
//! use github_models::config::{ApiStyle, Config, SecretString, DEFAULT_BASE_URL};
//!
//! // Build a config directly (use Config::from_env() in production)
//! let config = Config {
//!     api_key: Some(SecretString::new("ghp_example_token")),
//!     api_style: ApiStyle::OpenAi,
//!     ..Config::default()
//! };
//!
//! assert_eq!(config.base_url, DEFAULT_BASE_URL);
//! // API key is protected from accidental logging
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("ghp_example_token"));
//! ```

mod secret;
mod style;
mod validation;

pub use secret::SecretString;
pub use style::ApiStyle;
pub use validation::validate_config;

/// API key variable.
pub const ENV_API_KEY: &str = "GITHUB_MODELS_API_KEY";
/// Base URL variable.
pub const ENV_BASE_URL: &str = "GITHUB_MODELS_BASE_URL";
/// Preferred-model toggle variable.
pub const ENV_ENABLE_CLAUDE_SONNET_3_5: &str = "ENABLE_CLAUDE_SONNET_3_5";
/// API style variable.
pub const ENV_API_STYLE: &str = "GITHUB_MODELS_API_STYLE";
/// Organization variable.
pub const ENV_ORG: &str = "GITHUB_MODELS_ORG";
/// API version variable.
pub const ENV_API_VERSION: &str = "GITHUB_MODELS_API_VERSION";
/// Allow-missing-key toggle variable.
pub const ENV_ALLOW_NO_API_KEY: &str = "GITHUB_MODELS_ALLOW_NO_API_KEY";
/// Debug header logging toggle variable.
pub const ENV_DEBUG_HEADERS: &str = "GITHUB_MODELS_DEBUG_HEADERS";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://models.github.ai";

/// Model used when no explicit model is given and the toggle is on.
pub const PREFERRED_MODEL: &str = "claude-sonnet-3.5";

/// Model used when no explicit model is given and the toggle is off.
pub const FALLBACK_MODEL: &str = "default-model";

/// Client configuration.
///
/// Use [`Config::from_env`] to resolve it from environment variables.
/// The `api_key` field uses [`SecretString`] to prevent accidental logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API token; never empty when present.
    pub api_key: Option<SecretString>,
    /// API host, e.g. `https://models.github.ai`.
    pub base_url: String,
    /// Selects [`PREFERRED_MODEL`] over [`FALLBACK_MODEL`] when no model is given.
    pub enable_claude_sonnet_3_5: bool,
    /// Request/response shape.
    pub api_style: ApiStyle,
    /// Organization used to scope inference URLs.
    pub org: Option<String>,
    /// Value of the `X-GitHub-Api-Version` header.
    pub api_version: Option<String>,
    /// Permit a client without an API key (simulated responses only).
    pub allow_no_api_key: bool,
    /// Log masked request headers before each POST.
    pub debug_log_headers: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables (with defaults):
    /// - `GITHUB_MODELS_API_KEY`: API token, trimmed (default: absent)
    /// - `GITHUB_MODELS_BASE_URL`: API host (default: `https://models.github.ai`)
    /// - `ENABLE_CLAUDE_SONNET_3_5`: prefer `claude-sonnet-3.5` (default: `1`)
    /// - `GITHUB_MODELS_API_STYLE`: `github`, `chat` or `openai` (default: `github`)
    /// - `GITHUB_MODELS_ORG`: organization (default: absent)
    /// - `GITHUB_MODELS_API_VERSION`: API version header (default: absent)
    /// - `GITHUB_MODELS_ALLOW_NO_API_KEY`: allow running without a key (default: `0`)
    /// - `GITHUB_MODELS_DEBUG_HEADERS`: log masked headers (default: `0`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(ENV_API_KEY).and_then(|raw| SecretString::from_trimmed(&raw));
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let api_style = lookup(ENV_API_STYLE).map_or_else(ApiStyle::default, |s| ApiStyle::parse(&s));

        Self {
            api_key,
            base_url,
            enable_claude_sonnet_3_5: parse_flag(lookup(ENV_ENABLE_CLAUDE_SONNET_3_5).as_deref(), true),
            api_style,
            org: lookup(ENV_ORG).filter(|v| !v.is_empty()),
            api_version: lookup(ENV_API_VERSION).filter(|v| !v.is_empty()),
            allow_no_api_key: parse_flag(lookup(ENV_ALLOW_NO_API_KEY).as_deref(), false),
            debug_log_headers: parse_flag(lookup(ENV_DEBUG_HEADERS).as_deref(), false),
        }
    }

    /// Model used when the caller does not name one.
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        if self.enable_claude_sonnet_3_5 {
            PREFERRED_MODEL
        } else {
            FALLBACK_MODEL
        }
    }

    /// Returns true when a non-empty API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|key| !key.is_empty())
    }

    /// Returns true when requests must be simulated instead of sent.
    #[must_use]
    pub fn simulated(&self) -> bool {
        !self.has_api_key() && self.allow_no_api_key
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            enable_claude_sonnet_3_5: true,
            api_style: ApiStyle::Github,
            org: None,
            api_version: None,
            allow_no_api_key: false,
            debug_log_headers: false,
        }
    }
}

/// Parse a boolean toggle: only `1`, `true` and `True` are true.
///
/// `default` applies when the variable is unset.
#[must_use]
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    value.map_or(default, |v| matches!(v, "1" | "true" | "True"))
}
