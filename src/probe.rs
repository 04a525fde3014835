//! Model probing.
//!
//! Sends a tiny prompt to each of a list of model names and records which
//! ones the current token can use. Probes run one after another and never
//! stop early.

use std::fmt;

use crate::client::GitHubModelsClient;
use crate::error::truncate_chars;
use crate::traits::Transport;

/// Model names tried by default.
pub const DEFAULT_PROBE_MODELS: [&str; 8] = [
    "claude-sonnet-3.5",
    "claude-sonnet-3",
    "claude-sonnet",
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4",
    "gpt-3.5-turbo",
    "gpt-3.5",
];

/// Prompt sent to each model.
pub const PROBE_PROMPT: &str = "Hello";

/// Token limit for each probe.
pub const PROBE_MAX_TOKENS: u32 = 8;

/// Characters of output kept per successful probe.
pub const PROBE_OUTPUT_CHARS: usize = 200;

/// Result of probing one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The model answered.
    Ok {
        /// Generated text, truncated to [`PROBE_OUTPUT_CHARS`].
        output: String,
    },
    /// The request failed.
    Failed {
        /// Rendered error.
        error: String,
    },
}

impl ProbeOutcome {
    /// Returns true if the model answered.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// One probed model and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProbe {
    /// Model name as given.
    pub model: String,
    /// What happened.
    pub outcome: ProbeOutcome,
}

impl fmt::Display for ModelProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ProbeOutcome::Ok { output } => write!(f, "{}: OK: {output:?}", self.model),
            ProbeOutcome::Failed { error } => write!(f, "{}: FAILED: {error}", self.model),
        }
    }
}

/// Probe each model in `candidates` in order.
pub async fn probe_models<T, S>(client: &GitHubModelsClient<T>, candidates: &[S]) -> Vec<ModelProbe>
where
    T: Transport,
    S: AsRef<str>,
{
    let mut probes = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let model = candidate.as_ref();
        let outcome = match client
            .generate_text(PROBE_PROMPT, Some(model), PROBE_MAX_TOKENS)
            .await
        {
            Ok(text) => ProbeOutcome::Ok {
                output: truncate_chars(&text, PROBE_OUTPUT_CHARS),
            },
            Err(e) => {
                tracing::warn!(model = %model, error = %e, "Model probe failed");
                ProbeOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        probes.push(ModelProbe {
            model: model.to_string(),
            outcome,
        });
    }

    probes
}
