//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Configuration fixtures
//! - `MockTransport` factories for common responses
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::config::{ApiStyle, Config, SecretString};
use crate::error::ClientError;
use crate::traits::{HttpResponse, MockTransport};

/// Configuration with key `testkey` and the given style.
#[must_use]
pub fn chat_config(style: &str) -> Config {
    Config {
        api_key: Some(SecretString::new("testkey")),
        api_style: ApiStyle::parse(style),
        ..Config::default()
    }
}

/// Create a mock transport whose POSTs return a fixed status and JSON body.
///
/// # Example
///
/// ```ignore
/// let mock = mock_post_response(200, &json!({"text": "hi"}));
/// let client = GitHubModelsClient::with_transport(config, options, mock)?;
/// ```
#[must_use]
pub fn mock_post_response(status: u16, body: &Value) -> MockTransport {
    let body = body.to_string();
    let mut mock = MockTransport::new();
    mock.expect_post_json()
        .returning(move |_url, _payload, _timeout| Ok(HttpResponse::new(status, body.clone())));
    mock
}

/// Create a mock transport whose POSTs answer 200 with `respond(payload)`.
#[must_use]
pub fn mock_post_echo<F>(respond: F) -> MockTransport
where
    F: Fn(&Value) -> Value + Send + 'static,
{
    let mut mock = MockTransport::new();
    mock.expect_post_json()
        .returning(move |_url, payload, _timeout| Ok(HttpResponse::json(&respond(payload))));
    mock
}

/// Create a mock transport whose POSTs fail below the HTTP layer.
#[must_use]
pub fn mock_post_transport_error() -> MockTransport {
    let mut mock = MockTransport::new();
    mock.expect_post_json().returning(|url, _payload, _timeout| {
        Err(ClientError::Transport {
            url: url.to_string(),
            message: "connection refused".into(),
        })
    });
    mock
}

/// Create a mock transport that answers GETs per URL and records every URL.
#[must_use]
pub fn mock_get_by_url<F>(calls: Arc<Mutex<Vec<String>>>, respond: F) -> MockTransport
where
    F: Fn(&str) -> Result<HttpResponse, ClientError> + Send + 'static,
{
    let mut mock = MockTransport::new();
    mock.expect_get().returning(move |url, _timeout| {
        calls.lock().unwrap().push(url.to_string());
        respond(url)
    });
    mock
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    use crate::traits::Transport;

    #[test]
    fn test_chat_config() {
        let config = chat_config("openai");
        assert!(config.has_api_key());
        assert_eq!(config.api_style, ApiStyle::OpenAi);
    }

    #[tokio::test]
    async fn test_mock_post_response() {
        let mock = mock_post_response(201, &json!({"ok": true}));
        let response = mock
            .post_json("u", &json!({}), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response, HttpResponse::new(201, r#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn test_mock_get_by_url_records() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mock = mock_get_by_url(Arc::clone(&calls), |_url| Ok(HttpResponse::new(404, "")));
        mock.get("a", Duration::from_secs(1)).await.unwrap();
        mock.get("b", Duration::from_secs(1)).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }
}
