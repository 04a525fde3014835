//! Configuration validation.
//!
//! Checks that a configuration can back a client.

use super::{Config, ENV_API_KEY};
use crate::error::ConfigError;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRequired`] if there is no API key and
/// `GITHUB_MODELS_ALLOW_NO_API_KEY` is not set.
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !config.has_api_key() && !config.allow_no_api_key {
        return Err(ConfigError::MissingRequired {
            var: ENV_API_KEY.into(),
        });
    }
    Ok(())
}
