//! GitHub Models client
//!
//! A thin client for the GitHub Models text-generation API.
//!
//! # Features
//!
//! - Configuration from environment variables with secret redaction
//! - Three request styles (GitHub chat, generic chat, legacy completions)
//! - Tolerant text extraction from several response shapes
//! - Model listing across candidate endpoints
//! - Model probing over a list of names
//!
//! # Quick Start
//!
//! ```bash
//! GITHUB_MODELS_API_KEY=ghp_xxx ./github-models generate
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  generate_text   ┌──────────────────┐  POST /inference/...
//! │  Caller  │─────────────────▶│ GitHubModelsClient│─────────────────────▶ GitHub Models
//! │          │◀─────────────────│   (Transport)     │◀─────────────────────
//! └──────────┘      String      └──────────────────┘     JSON body
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod probe;
pub mod traits;

#[cfg(test)]
mod test_utils;
