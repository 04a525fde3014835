//! GitHub Models API client.
//!
//! This module provides the inference client:
//! - Session headers and the `reqwest` transport
//! - Endpoint construction for each API style
//! - Text extraction from loosely shaped responses
//! - Model-listing discovery across candidate endpoints
//!
//! # Example
//!
//! ```ignore
//! use github_models::client::{GitHubModelsClient, DEFAULT_MAX_TOKENS};
//! use github_models::config::Config;
//!
//! let client = GitHubModelsClient::new(Config::from_env())?;
//! let text = client.generate_text("Hello", None, DEFAULT_MAX_TOKENS).await?;
//! ```

mod api;
mod discovery;
mod endpoints;
mod options;
mod response;
mod session;

pub use api::{simulated_response, GitHubModelsClient, ModelListing};
pub use discovery::try_in_order;
pub use endpoints::{
    chat_completions_url, completions_url, model_list_candidates, normalize_base,
    normalize_model, org_segment, CandidateEndpoint,
};
pub use options::{
    ClientOptions, DEFAULT_DISCOVERY_HOST, DEFAULT_DISCOVERY_TIMEOUT_MS, DEFAULT_MAX_TOKENS,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
pub use response::ResponseShape;
pub use session::{
    mask_authorization, masked_headers, session_headers, ReqwestTransport, ACCEPT_MEDIA_TYPE,
    API_VERSION_HEADER,
};
