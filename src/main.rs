//! GitHub Models binary entry point.
//!
//! ```text
//! github-models [generate|list-models|try-models]
//! ```
//!
//! Results go to stdout; logs and errors go to stderr.

use std::process::ExitCode;

use github_models::client::{GitHubModelsClient, ModelListing, DEFAULT_MAX_TOKENS};
use github_models::config::Config;
use github_models::error::ClientError;
use github_models::probe::{probe_models, DEFAULT_PROBE_MODELS};

const DEFAULT_EXAMPLE_PROMPT: &str = "Write a short sonnet about coding in Python.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Generate,
    ListModels,
    TryModels,
}

impl Command {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg {
            None | Some("generate") => Some(Self::Generate),
            Some("list-models") => Some(Self::ListModels),
            Some("try-models") => Some(Self::TryModels),
            Some(_) => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let arg = std::env::args().nth(1);
    let Some(command) = Command::parse(arg.as_deref()) else {
        eprintln!(
            "Unknown command: {}. Expected one of: generate, list-models, try-models",
            arg.unwrap_or_default()
        );
        return ExitCode::FAILURE;
    };

    let config = Config::from_env();
    tracing::debug!(
        base_url = %config.base_url,
        style = %config.api_style,
        org = ?config.org,
        "Configuration loaded"
    );

    match run(command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: Config) -> Result<(), ClientError> {
    let client = GitHubModelsClient::new(config)?;

    match command {
        Command::Generate => {
            let prompt = std::env::var("EXAMPLE_PROMPT")
                .unwrap_or_else(|_| DEFAULT_EXAMPLE_PROMPT.to_string());
            let model = std::env::var("GITHUB_MODELS_DEFAULT_MODEL")
                .ok()
                .filter(|m| !m.is_empty());

            println!("Using model: {}", client.resolve_model(model.as_deref()));
            let text = client
                .generate_text(&prompt, model.as_deref(), DEFAULT_MAX_TOKENS)
                .await?;
            println!("---\nResult:\n");
            println!("{text}");
        }
        Command::ListModels => {
            let (url, listing) = client.list_models().await?;
            println!("Models listed from {url}");
            match listing {
                ModelListing::Json(value) => {
                    let pretty =
                        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                    println!("{pretty}");
                }
                ModelListing::Text(text) => println!("{text}"),
            }
        }
        Command::TryModels => {
            println!("Using model list candidates:");
            for model in DEFAULT_PROBE_MODELS {
                println!(" - {model}");
            }
            println!();
            for probe in probe_models(&client, &DEFAULT_PROBE_MODELS).await {
                println!("{probe}");
            }
        }
    }

    Ok(())
}
