//! Trait definitions for mockable dependencies.
//!
//! This module defines [`Transport`], the HTTP seam used by the client.
//! It also re-exports shared types from the `types` submodule.
//!
//! # Mocking
//!
//! The trait is annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates `MockTransport` for unit tests.

mod types;

pub use types::HttpResponse;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientError;

/// HTTP transport used by the client.
///
/// Implementations carry the session headers themselves; the client only
/// supplies URL, payload and timeout. Non-2xx statuses are returned as
/// responses, not errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] or [`ClientError::Timeout`] if no
    /// response was received.
    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, ClientError>;

    /// Issue a GET.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] or [`ClientError::Timeout`] if no
    /// response was received.
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, ClientError>;
}
