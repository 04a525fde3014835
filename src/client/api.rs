//! GitHub Models API client.
//!
//! This module provides:
//! - Style dispatch for text generation
//! - Request/response handling with detailed HTTP errors
//! - Model-listing discovery across candidate endpoints

#![allow(clippy::missing_errors_doc)]

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use super::discovery::try_in_order;
use super::endpoints::{
    chat_completions_url, completions_url, model_list_candidates, normalize_model,
    CandidateEndpoint,
};
use super::options::ClientOptions;
use super::response::ResponseShape;
use super::session::{log_debug_headers, session_headers, ReqwestTransport};
use crate::config::{ApiStyle, Config};
use crate::error::{ClientError, ProbeFailure};
use crate::traits::{HttpResponse, Transport};

/// Text returned for chat styles when running without an API key.
#[must_use]
pub fn simulated_response(prompt: &str) -> String {
    format!("[debug] simulated response for prompt: {prompt}")
}

/// Body returned by a successful model-listing candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelListing {
    /// The body parsed as JSON.
    Json(Value),
    /// The raw body, when it is not JSON.
    Text(String),
}

impl ModelListing {
    /// Parse a body, keeping the raw text when it is not JSON.
    #[must_use]
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

impl<'a> ChatCompletionRequest<'a> {
    const fn new(model: &'a str, prompt: &'a str, max_tokens: u32) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

/// GitHub Models API client.
///
/// Holds the configuration, the fixed session headers and a transport that
/// sends them. The client keeps no mutable state and can be shared.
#[derive(Debug)]
pub struct GitHubModelsClient<T = ReqwestTransport> {
    config: Config,
    options: ClientOptions,
    headers: HeaderMap,
    transport: T,
}

impl GitHubModelsClient {
    /// Create a client with default options.
    ///
    /// Fails with [`ClientError::Configuration`] when there is no API key and
    /// `allow_no_api_key` is not set.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        Self::with_options(config, ClientOptions::default())
    }

    /// Create a client with custom options.
    pub fn with_options(config: Config, options: ClientOptions) -> Result<Self, ClientError> {
        let headers = session_headers(&config)?;
        let transport = ReqwestTransport::new(headers.clone())?;
        Ok(Self {
            config,
            options,
            headers,
            transport,
        })
    }
}

impl<T: Transport> GitHubModelsClient<T> {
    /// Create a client over a caller-supplied transport.
    ///
    /// The configuration is validated exactly as in [`GitHubModelsClient::new`].
    /// The transport is expected to send [`Self::headers`] itself.
    pub fn with_transport(
        config: Config,
        options: ClientOptions,
        transport: T,
    ) -> Result<Self, ClientError> {
        let headers = session_headers(&config)?;
        Ok(Self {
            config,
            options,
            headers,
            transport,
        })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get the client options.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Get the session headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Model sent for a request: the explicit one, normalized, or the
    /// configured default.
    #[must_use]
    pub fn resolve_model(&self, model: Option<&str>) -> String {
        model
            .map(normalize_model)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.config.default_model().to_string())
    }

    /// Generate text for `prompt`.
    ///
    /// The request and response shapes follow the configured [`ApiStyle`].
    /// Chat styles without an API key return [`simulated_response`] without
    /// any network call.
    pub async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
        max_tokens: u32,
    ) -> Result<String, ClientError> {
        let model = self.resolve_model(model);
        let style = &self.config.api_style;
        let base = &self.config.base_url;
        let org = self.config.org.as_deref();

        tracing::debug!(style = %style, model = %model, max_tokens, "Generating text");

        match style {
            ApiStyle::Github | ApiStyle::Chat => {
                if self.config.simulated() {
                    tracing::debug!("No API key configured, returning simulated response");
                    return Ok(simulated_response(prompt));
                }
                let url = chat_completions_url(base, org);
                let request = ChatCompletionRequest::new(&model, prompt, max_tokens);
                let body = self.post_json(&url, &request).await?;
                Ok(ResponseShape::chat(&body).into_text())
            }
            ApiStyle::OpenAi => {
                let url = completions_url(base, org);
                let request = CompletionRequest {
                    model: &model,
                    prompt,
                    max_tokens,
                };
                let body = self.post_json(&url, &request).await?;
                Ok(ResponseShape::completion(&body).into_text())
            }
            ApiStyle::Other(raw) => {
                // Unscoped URL and body-level extraction only; kept as observed
                // behaviour for unrecognized styles.
                tracing::warn!(style = %raw, "Unrecognized API style, using fallback endpoint");
                let url = chat_completions_url(base, None);
                let request = ChatCompletionRequest::new(&model, prompt, max_tokens);
                let body = self.post_json(&url, &request).await?;
                Ok(ResponseShape::body_fields(&body).into_text())
            }
        }
    }

    /// List the models available to the current token.
    ///
    /// Tries each candidate endpoint in order and returns the first 2xx
    /// response as `(url, body)`. Individual failures are not errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Discovery`] listing every tried URL when all
    /// candidates fail.
    pub async fn list_models(&self) -> Result<(String, ModelListing), ClientError> {
        let candidates = model_list_candidates(
            &self.config.base_url,
            self.config.org.as_deref(),
            &self.options.discovery_host,
        );
        let timeout = self.options.discovery_timeout();
        let transport = &self.transport;

        let outcome = try_in_order(&candidates, |candidate: &CandidateEndpoint| {
            let candidate = candidate.clone();
            async move {
                let response = transport
                    .get(&candidate.url, timeout)
                    .await
                    .map_err(ProbeFailure::from)?;
                if candidate.accepts(&response) {
                    Ok(response)
                } else {
                    Err(ProbeFailure::status(response.status, &response.body))
                }
            }
        })
        .await;

        match outcome {
            Ok((candidate, response)) => {
                tracing::info!(url = %candidate.url, "Listed models");
                Ok((candidate.url.clone(), ModelListing::from_body(response.body)))
            }
            Err(last_failure) => Err(ClientError::Discovery {
                tried: candidates.iter().map(|c| c.url.clone()).collect(),
                last_failure,
            }),
        }
    }

    /// POST a JSON payload and decode a 2xx JSON body.
    async fn post_json<P: Serialize + Sync>(
        &self,
        url: &str,
        request: &P,
    ) -> Result<Value, ClientError> {
        let payload = serde_json::to_value(request).map_err(|e| ClientError::InvalidRequest {
            message: format!("Failed to encode request: {e}"),
        })?;

        if self.config.debug_log_headers {
            log_debug_headers(&self.headers, url, &payload);
        }

        let start = Instant::now();
        let timeout = self.options.request_timeout();

        tracing::debug!(
            url = %url,
            timeout_ms = self.options.request_timeout_ms,
            "Starting GitHub Models API request"
        );

        let response = self
            .transport
            .post_json(url, &payload, timeout)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    url = %url,
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "GitHub Models API request failed"
                );
            })?;

        tracing::debug!(
            url = %url,
            status = response.status,
            elapsed_ms = elapsed_ms(start),
            "GitHub Models API response received"
        );

        decode_json(url, response)
    }
}

fn decode_json(url: &str, response: HttpResponse) -> Result<Value, ClientError> {
    if !response.is_success() {
        return Err(ClientError::http_status(response.status, url, &response.body));
    }
    serde_json::from_str(&response.body).map_err(|e| ClientError::InvalidResponse {
        url: url.to_string(),
        message: format!("Failed to parse response: {e}"),
    })
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::too_many_lines
)]
mod tests {
    use super::*;
    use crate::config::{SecretString, FALLBACK_MODEL, PREFERRED_MODEL};
    use crate::error::MAX_ERROR_BODY_CHARS;
    use crate::test_utils::{
        chat_config, mock_get_by_url, mock_post_echo, mock_post_response, mock_post_transport_error,
    };
    use crate::traits::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn client_with(config: Config, transport: MockTransport) -> GitHubModelsClient<MockTransport> {
        GitHubModelsClient::with_transport(config, ClientOptions::default(), transport).unwrap()
    }

    // Construction tests
    #[test]
    fn test_new_requires_api_key() {
        let result = GitHubModelsClient::new(Config::default());
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_new_with_key() {
        let client = GitHubModelsClient::new(chat_config("github")).unwrap();
        assert_eq!(client.headers()["authorization"], "Bearer testkey");
        assert_eq!(client.options(), &ClientOptions::default());
    }

    #[test]
    fn test_new_without_key_when_allowed() {
        let config = Config {
            allow_no_api_key: true,
            ..Config::default()
        };
        let client = GitHubModelsClient::new(config).unwrap();
        assert!(client.headers().get("authorization").is_none());
    }

    #[test]
    fn test_with_transport_validates() {
        let result = GitHubModelsClient::with_transport(
            Config::default(),
            ClientOptions::default(),
            MockTransport::new(),
        );
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    // Model resolution tests
    #[test]
    fn test_resolve_model() {
        let client = client_with(chat_config("github"), MockTransport::new());
        assert_eq!(client.resolve_model(Some("/foo-model")), "foo-model");
        assert_eq!(client.resolve_model(Some(" gpt-4o ")), "gpt-4o");
        assert_eq!(client.resolve_model(None), PREFERRED_MODEL);
        assert_eq!(client.resolve_model(Some("")), PREFERRED_MODEL);
        assert_eq!(client.resolve_model(Some(" / ")), PREFERRED_MODEL);

        let config = Config {
            enable_claude_sonnet_3_5: false,
            ..chat_config("github")
        };
        let client = client_with(config, MockTransport::new());
        assert_eq!(client.resolve_model(None), FALLBACK_MODEL);
    }

    // generate_text tests
    #[tokio::test]
    async fn test_github_style_message_content() {
        let transport = mock_post_response(
            200,
            &json!({"choices": [{"message": {"content": "exact text"}}]}),
        );
        let client = client_with(chat_config("github"), transport);

        let text = client.generate_text("hi", None, 512).await.unwrap();
        assert_eq!(text, "exact text");
    }

    #[tokio::test]
    async fn test_github_style_echo() {
        let transport = mock_post_echo(|payload| {
            let content = payload["messages"][0]["content"].as_str().unwrap_or_default();
            json!({"choices": [{"message": {"content": format!("{content} world")}}]})
        });
        let client = client_with(chat_config("github"), transport);

        let text = client.generate_text("hi", None, 512).await.unwrap();
        assert_eq!(text, "hi world");
    }

    #[tokio::test]
    async fn test_chat_request_shape() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let mut transport = MockTransport::new();
        transport
            .expect_post_json()
            .times(1)
            .returning(move |url, payload, timeout| {
                *seen_clone.lock().unwrap() = Some((url.to_string(), payload.clone(), timeout));
                Ok(HttpResponse::json(&json!({"generated_text": "ok"})))
            });
        let config = Config {
            org: Some("acme".into()),
            base_url: "https://models.example/".into(),
            ..chat_config("chat")
        };
        let client = client_with(config, transport);

        let text = client.generate_text("hey", Some("/foo-model"), 64).await.unwrap();
        assert_eq!(text, "ok");

        let (url, payload, timeout) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(url, "https://models.example/orgs/acme/inference/chat/completions");
        assert_eq!(
            payload,
            json!({
                "model": "foo-model",
                "messages": [{"role": "user", "content": "hey"}],
                "max_tokens": 64
            })
        );
        assert_eq!(timeout, ClientOptions::default().request_timeout());
    }

    #[tokio::test]
    async fn test_openai_style() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let mut transport = MockTransport::new();
        transport
            .expect_post_json()
            .times(1)
            .returning(move |url, payload, _timeout| {
                *seen_clone.lock().unwrap() = Some((url.to_string(), payload.clone()));
                let prompt = payload["prompt"].as_str().unwrap_or_default();
                Ok(HttpResponse::json(
                    &json!({"choices": [{"text": format!("{prompt} openai")}]}),
                ))
            });
        let client = client_with(chat_config("openai"), transport);

        let text = client.generate_text("hello", None, 512).await.unwrap();
        assert_eq!(text, "hello openai");

        let (url, payload) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(url, "https://models.github.ai/inference/completions");
        assert_eq!(
            payload,
            json!({"model": PREFERRED_MODEL, "prompt": "hello", "max_tokens": 512})
        );
    }

    #[tokio::test]
    async fn test_openai_style_without_choices_dumps_body() {
        let transport = mock_post_response(200, &json!({"generated_text": "ignored"}));
        let client = client_with(chat_config("openai"), transport);

        let text = client.generate_text("hello", None, 512).await.unwrap();
        let dumped: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(dumped, json!({"generated_text": "ignored"}));
    }

    #[tokio::test]
    async fn test_simulated_response_makes_no_call() {
        let mut transport = MockTransport::new();
        transport.expect_post_json().never();
        transport.expect_get().never();
        let config = Config {
            allow_no_api_key: true,
            api_style: ApiStyle::Chat,
            ..Config::default()
        };
        let client = client_with(config, transport);

        let text = client.generate_text("tell me a joke", None, 512).await.unwrap();
        assert_eq!(text, "[debug] simulated response for prompt: tell me a joke");
    }

    #[tokio::test]
    async fn test_openai_style_without_key_is_not_simulated() {
        let transport = mock_post_response(401, &json!({"message": "Bad credentials"}));
        let config = Config {
            allow_no_api_key: true,
            api_style: ApiStyle::OpenAi,
            ..Config::default()
        };
        let client = client_with(config, transport);

        let err = client.generate_text("hi", None, 512).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_unknown_style_uses_body_fields_only() {
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let mut transport = MockTransport::new();
        transport
            .expect_post_json()
            .times(1)
            .returning(move |url, _payload, _timeout| {
                *seen_clone.lock().unwrap() = Some(url.to_string());
                Ok(HttpResponse::json(&json!({
                    "choices": [{"message": {"content": "skipped"}}],
                    "text": "from body"
                })))
            });
        let config = Config {
            org: Some("acme".into()),
            ..chat_config("legacy")
        };
        let client = client_with(config, transport);

        let text = client.generate_text("hi", None, 512).await.unwrap();
        assert_eq!(text, "from body");
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            "https://models.github.ai/inference/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_unknown_style_without_key_is_not_simulated() {
        let transport = mock_post_response(200, &json!({"text": "sent"}));
        let config = Config {
            allow_no_api_key: true,
            api_style: ApiStyle::Other("legacy".into()),
            ..Config::default()
        };
        let client = client_with(config, transport);

        assert_eq!(client.generate_text("hi", None, 8).await.unwrap(), "sent");
    }

    #[tokio::test]
    async fn test_http_error_carries_status_url_and_truncated_body() {
        let long_body = "x".repeat(MAX_ERROR_BODY_CHARS * 2);
        let mut transport = MockTransport::new();
        transport
            .expect_post_json()
            .returning(move |_url, _payload, _timeout| Ok(HttpResponse::new(500, long_body.clone())));
        let client = client_with(chat_config("github"), transport);

        let err = client.generate_text("hi", None, 512).await.unwrap_err();
        match &err {
            ClientError::HttpStatus { status, url, body } => {
                assert_eq!(*status, 500);
                assert_eq!(url, "https://models.github.ai/inference/chat/completions");
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("Wrong error type: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.starts_with("HTTP 500 when requesting"));
        assert!(!message.contains(&"x".repeat(MAX_ERROR_BODY_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = client_with(chat_config("github"), mock_post_transport_error());

        let err = client.generate_text("hi", None, 512).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_non_json_success_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_post_json()
            .returning(|_url, _payload, _timeout| Ok(HttpResponse::new(200, "<html>")));
        let client = client_with(chat_config("github"), transport);

        let err = client.generate_text("hi", None, 512).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_debug_headers_do_not_affect_request() {
        let transport = mock_post_response(200, &json!({"text": "fine"}));
        let config = Config {
            debug_log_headers: true,
            ..chat_config("github")
        };
        let client = client_with(config, transport);

        assert_eq!(client.generate_text("hi", None, 512).await.unwrap(), "fine");
    }

    // list_models tests
    #[tokio::test]
    async fn test_list_models_returns_first_success() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = mock_get_by_url(Arc::clone(&calls), |url| {
            if url == "https://models.github.ai/inference/models" {
                Ok(HttpResponse::json(&json!([{"id": "gpt-4o"}])))
            } else {
                Ok(HttpResponse::new(404, "not here"))
            }
        });
        let client = client_with(chat_config("github"), transport);

        let (url, listing) = client.list_models().await.unwrap();
        assert_eq!(url, "https://models.github.ai/inference/models");
        assert_eq!(listing, ModelListing::Json(json!([{"id": "gpt-4o"}])));
        // Candidates 3 and 4 coincide without an organization.
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_models_raw_text_body() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = mock_get_by_url(Arc::clone(&calls), |_url| Ok(HttpResponse::new(200, "gpt-4o\ngpt-4")));
        let client = client_with(chat_config("github"), transport);

        let (url, listing) = client.list_models().await.unwrap();
        assert_eq!(url, "https://models.github.ai/models");
        assert_eq!(listing, ModelListing::Text("gpt-4o\ngpt-4".into()));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_models_skips_transport_errors() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = mock_get_by_url(Arc::clone(&calls), |url| {
            if url.starts_with("https://api.github.com") {
                Ok(HttpResponse::json(&json!({"data": []})))
            } else {
                Err(ClientError::Transport {
                    url: url.to_string(),
                    message: "connection refused".into(),
                })
            }
        });
        let client = client_with(chat_config("github"), transport);

        let (url, _) = client.list_models().await.unwrap();
        assert_eq!(url, "https://api.github.com/models");
        assert_eq!(calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_list_models_all_fail_lists_every_candidate() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = mock_get_by_url(Arc::clone(&calls), |_url| Ok(HttpResponse::new(403, "forbidden")));
        let config = Config {
            org: Some("acme".into()),
            ..chat_config("github")
        };
        let client = client_with(config, transport);

        let err = client.list_models().await.unwrap_err();
        let attempted = calls.lock().unwrap().clone();
        assert_eq!(attempted.len(), 8);

        match &err {
            ClientError::Discovery { tried, last_failure } => {
                assert_eq!(tried, &attempted);
                assert_eq!(last_failure, &Some(ProbeFailure::status(403, "forbidden")));
            }
            other => panic!("Wrong error type: {other:?}"),
        }
        let message = err.to_string();
        for url in &attempted {
            assert!(message.contains(url.as_str()), "missing {url}");
        }
        assert!(message.ends_with("; last response 403: forbidden"));
    }

    #[tokio::test]
    async fn test_list_models_last_failure_is_error() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = mock_get_by_url(Arc::clone(&calls), |url| {
            if url.ends_with("/inference/models") && url.starts_with("https://api.github.com") {
                Err(ClientError::Timeout {
                    url: url.to_string(),
                    timeout_ms: 15_000,
                })
            } else {
                Ok(HttpResponse::new(404, "missing"))
            }
        });
        let client = client_with(chat_config("github"), transport);

        let err = client.list_models().await.unwrap_err();
        assert!(err.to_string().contains("; last error: Request to https://api.github.com/inference/models timed out"));
    }

    #[test]
    fn test_model_listing_from_body() {
        assert_eq!(
            ModelListing::from_body(r#"{"models": []}"#.into()),
            ModelListing::Json(json!({"models": []}))
        );
        assert_eq!(
            ModelListing::from_body("plain".into()),
            ModelListing::Text("plain".into())
        );
    }

    #[test]
    fn test_simulated_response_text() {
        assert_eq!(
            simulated_response("abc"),
            "[debug] simulated response for prompt: abc"
        );
    }

    #[test]
    fn test_client_debug_hides_key() {
        let config = Config {
            api_key: Some(SecretString::new("very-secret")),
            ..Config::default()
        };
        let client = GitHubModelsClient::new(config).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("GitHubModelsClient"));
        assert!(!debug.contains("very-secret"));
    }
}
