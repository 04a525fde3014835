//! HTTP session: fixed headers and the `reqwest` transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::{Client, RequestBuilder};

use crate::config::{validate_config, Config, ENV_API_KEY, ENV_API_VERSION};
use crate::error::{ClientError, ConfigError};
use crate::traits::{HttpResponse, Transport};

/// Media type sent in the `Accept` header.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Header carrying the configured API version.
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// Build the session headers for a configuration.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRequired`] when there is no key and running
/// without one is not allowed, or [`ConfigError::InvalidValue`] when the key
/// or API version cannot be sent as a header value.
pub fn session_headers(config: &Config) -> Result<HeaderMap, ConfigError> {
    validate_config(config)?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPE));

    if let Some(key) = config.api_key.as_ref().filter(|key| !key.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose())).map_err(|_| {
            ConfigError::InvalidValue {
                var: ENV_API_KEY.into(),
                reason: "not a valid header value".into(),
            }
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    if let Some(version) = &config.api_version {
        let value = HeaderValue::from_str(version).map_err(|_| ConfigError::InvalidValue {
            var: ENV_API_VERSION.into(),
            reason: "not a valid header value".into(),
        })?;
        headers.insert(HeaderName::from_static(API_VERSION_HEADER), value);
    }

    Ok(headers)
}

/// Mask an `Authorization` value down to its scheme.
///
/// `Bearer abc` becomes `Bearer [REDACTED]`; a value without a scheme becomes
/// `[REDACTED]`.
#[must_use]
pub fn mask_authorization(value: &str) -> String {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(_)) => format!("{scheme} [REDACTED]"),
        _ => "[REDACTED]".to_string(),
    }
}

/// Headers as printable pairs with the token masked.
#[must_use]
pub fn masked_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or("<non-utf8>");
            let shown = if *name == AUTHORIZATION {
                mask_authorization(value)
            } else {
                value.to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

/// Log the masked session headers and payload model before a POST.
pub(crate) fn log_debug_headers(headers: &HeaderMap, url: &str, payload: &serde_json::Value) {
    let masked = masked_headers(headers);
    tracing::info!(
        target: "github_models::headers",
        url = %url,
        headers = ?masked,
        "POST request headers"
    );
    if let Some(model) = payload.get("model") {
        tracing::info!(target: "github_models::headers", model = %model, "Payload model");
    }
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport that sends `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if the HTTP client cannot be built.
    pub fn new(headers: HeaderMap) -> Result<Self, ClientError> {
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::InvalidRequest {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    async fn send(
        url: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<HttpResponse, ClientError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, &e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(url, timeout, &e))?;
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, ClientError> {
        Self::send(url, self.client.post(url).json(payload), timeout).await
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, ClientError> {
        Self::send(url, self.client.get(url), timeout).await
    }
}

fn map_reqwest_error(url: &str, timeout: Duration, err: &reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            url: url.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else {
        ClientError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
