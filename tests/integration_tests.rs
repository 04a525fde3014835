//! Integration tests for the GitHub Models client.
//!
//! These tests run the real `reqwest` transport against a local mock server:
//! - Text generation in each API style
//! - Session headers on the wire
//! - HTTP error reporting
//! - Model-listing discovery
//! - Configuration from the process environment

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use github_models::client::{ClientOptions, GitHubModelsClient, ModelListing};
use github_models::config::{ApiStyle, Config, SecretString};
use github_models::error::{ClientError, ProbeFailure, MAX_ERROR_BODY_CHARS};
use github_models::probe::{probe_models, ProbeOutcome};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Utilities
// ============================================================================

fn server_config(server: &MockServer, style: ApiStyle) -> Config {
    Config {
        api_key: Some(SecretString::new("testkey")),
        base_url: server.uri(),
        api_style: style,
        ..Config::default()
    }
}

fn server_client(server: &MockServer, config: Config) -> GitHubModelsClient {
    let options = ClientOptions::new()
        .with_discovery_host(server.uri())
        .with_request_timeout_ms(2_000)
        .with_discovery_timeout_ms(2_000);
    GitHubModelsClient::with_options(config, options).expect("client")
}

// ============================================================================
// Text Generation Tests
// ============================================================================

#[tokio::test]
async fn test_generate_github_style() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/chat/completions"))
        .and(header("authorization", "Bearer testkey"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "model": "claude-sonnet-3.5",
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 512
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi world"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = server_client(&server, server_config(&server, ApiStyle::Github));
    let text = client.generate_text("hi", None, 512).await.unwrap();

    assert_eq!(text, "hi world");
}

#[tokio::test]
async fn test_generate_chat_style_with_org_and_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orgs/acme/inference/chat/completions"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"delta": {"content": "streamed"}}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        org: Some("acme".into()),
        api_version: Some("2022-11-28".into()),
        ..server_config(&server, ApiStyle::Chat)
    };
    let client = server_client(&server, config);
    let text = client.generate_text("hi", Some("gpt-4o"), 64).await.unwrap();

    assert_eq!(text, "streamed");
}

#[tokio::test]
async fn test_generate_openai_style() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/completions"))
        .and(body_json(json!({
            "model": "foo-model",
            "prompt": "hello",
            "max_tokens": 16
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"choices": [{"text": "hello openai"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = server_client(&server, server_config(&server, ApiStyle::OpenAi));
    let text = client
        .generate_text("hello", Some("/foo-model"), 16)
        .await
        .unwrap();

    assert_eq!(text, "hello openai");
}

#[tokio::test]
async fn test_generate_unknown_style_ignores_org() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "gen"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        org: Some("acme".into()),
        ..server_config(&server, ApiStyle::parse("legacy"))
    };
    let client = server_client(&server, config);

    assert_eq!(client.generate_text("hi", None, 8).await.unwrap(), "gen");
}

#[tokio::test]
async fn test_generate_without_key_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "anonymous"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_key: None,
        allow_no_api_key: true,
        ..server_config(&server, ApiStyle::OpenAi)
    };
    let client = server_client(&server, config);
    let text = client.generate_text("hi", None, 8).await.unwrap();

    // No choices: the whole body is dumped.
    let dumped: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(dumped, json!({"text": "anonymous"}));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_simulated_chat_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        api_key: None,
        allow_no_api_key: true,
        ..server_config(&server, ApiStyle::Github)
    };
    let client = server_client(&server, config);
    let text = client.generate_text("ping", None, 8).await.unwrap();

    assert_eq!(text, "[debug] simulated response for prompt: ping");
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn test_http_error_truncates_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("e".repeat(5_000)))
        .mount(&server)
        .await;

    let client = server_client(&server, server_config(&server, ApiStyle::Github));
    let err = client.generate_text("hi", None, 512).await.unwrap_err();

    match &err {
        ClientError::HttpStatus { status, url, body } => {
            assert_eq!(*status, 500);
            assert_eq!(url, &format!("{}/inference/chat/completions", server.uri()));
            assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS);
        }
        other => panic!("Wrong error type: {other:?}"),
    }
    assert!(err.to_string().starts_with("HTTP 500 when requesting"));
}

#[tokio::test]
async fn test_non_json_success_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = server_client(&server, server_config(&server, ApiStyle::Github));
    let err = client.generate_text("hi", None, 512).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"text": "late"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let options = ClientOptions::new().with_request_timeout_ms(50);
    let client =
        GitHubModelsClient::with_options(server_config(&server, ApiStyle::Github), options)
            .unwrap();
    let err = client.generate_text("hi", None, 8).await.unwrap_err();

    assert!(
        matches!(err, ClientError::Timeout { timeout_ms: 50, .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = Config {
        api_key: Some(SecretString::new("testkey")),
        base_url: "http://127.0.0.1:9".into(),
        ..Config::default()
    };
    let options = ClientOptions::new().with_request_timeout_ms(2_000);
    let client = GitHubModelsClient::with_options(config, options).unwrap();

    let err = client.generate_text("hi", None, 8).await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[test]
fn test_missing_key_rejected() {
    let err = GitHubModelsClient::new(Config::default()).unwrap_err();
    assert!(err.to_string().contains("GITHUB_MODELS_API_KEY is required"));
}

// ============================================================================
// Model Listing Tests
// ============================================================================

#[tokio::test]
async fn test_list_models_first_success_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inference/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "gpt-4o"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/inference/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "org-model"}])))
        .mount(&server)
        .await;

    let config = Config {
        org: Some("acme".into()),
        ..server_config(&server, ApiStyle::Github)
    };
    let client = server_client(&server, config);
    let (url, listing) = client.list_models().await.unwrap();

    assert_eq!(url, format!("{}/orgs/acme/inference/models", server.uri()));
    assert_eq!(listing, ModelListing::Json(json!([{"name": "org-model"}])));

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec!["/orgs/acme/models", "/models", "/orgs/acme/inference/models"]
    );
}

#[tokio::test]
async fn test_list_models_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("gpt-4o\ngpt-4"))
        .mount(&server)
        .await;

    let client = server_client(&server, server_config(&server, ApiStyle::Github));
    let (url, listing) = client.list_models().await.unwrap();

    assert_eq!(url, format!("{}/models", server.uri()));
    assert_eq!(listing, ModelListing::Text("gpt-4o\ngpt-4".into()));
}

#[tokio::test]
async fn test_list_models_all_candidates_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let config = Config {
        org: Some("acme".into()),
        ..server_config(&server, ApiStyle::Github)
    };
    let client = server_client(&server, config);
    let err = client.list_models().await.unwrap_err();

    let uri = server.uri();
    match &err {
        ClientError::Discovery {
            tried,
            last_failure,
        } => {
            assert_eq!(
                tried,
                &vec![
                    format!("{uri}/orgs/acme/models"),
                    format!("{uri}/models"),
                    format!("{uri}/orgs/acme/inference/models"),
                    format!("{uri}/inference/models"),
                    format!("{uri}/models"),
                    format!("{uri}/orgs/acme/models"),
                    format!("{uri}/orgs/acme/inference/models"),
                    format!("{uri}/inference/models"),
                ]
            );
            assert_eq!(last_failure, &Some(ProbeFailure::status(404, "Not Found")));
        }
        other => panic!("Wrong error type: {other:?}"),
    }
    assert!(err
        .to_string()
        .starts_with("Could not list models. Tried endpoints: "));
    assert_eq!(server.received_requests().await.unwrap().len(), 8);
}

// ============================================================================
// Probe Tests
// ============================================================================

#[tokio::test]
async fn test_probe_models_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "Hello"}],
            "max_tokens": 8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Hi!"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unknown model"))
        .mount(&server)
        .await;

    let client = server_client(&server, server_config(&server, ApiStyle::Github));
    let probes = probe_models(&client, &["gpt-4o", "nope"]).await;

    assert_eq!(
        probes[0].outcome,
        ProbeOutcome::Ok {
            output: "Hi!".into()
        }
    );
    assert!(matches!(&probes[1].outcome, ProbeOutcome::Failed { error } if error.contains("HTTP 400")));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
#[serial]
fn test_config_from_env() {
    std::env::set_var("GITHUB_MODELS_API_KEY", "  envkey  ");
    std::env::set_var("GITHUB_MODELS_API_STYLE", "OpenAI");
    std::env::set_var("GITHUB_MODELS_ORG", "acme");

    let config = Config::from_env();

    std::env::remove_var("GITHUB_MODELS_API_KEY");
    std::env::remove_var("GITHUB_MODELS_API_STYLE");
    std::env::remove_var("GITHUB_MODELS_ORG");

    assert_eq!(config.api_key.as_ref().map(SecretString::expose), Some("envkey"));
    assert_eq!(config.api_style, ApiStyle::OpenAi);
    assert_eq!(config.org.as_deref(), Some("acme"));
    assert!(!format!("{config:?}").contains("envkey"));
}
