//! Submits an adapted conversation to the model provider.
//!
//! # Public API
//!
//! - [`CompletionClient`]: the request/response seam the HTTP handler calls
//! - [`config::CompletionConfig`]: endpoint, model and timeout settings
//! - [`gemini::GeminiClient`]: Gemini `generateContent` implementation
//!
//! Clients make exactly one attempt per call. A failure surfaces directly to
//! the caller.

pub mod config;
#[cfg(feature = "gemini")]
pub mod gemini;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::adapter::ProviderRequest;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing or invalid configuration, e.g. no API key.
    #[error("Config error: {0}")]
    Config(String),

    /// The provider call failed or returned an error.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The provider did not answer within the configured timeout.
    #[error("Upstream error: request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
}

/// Request/response capability of a generative-AI provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submits `request` and returns the completion text.
    ///
    /// `api_key` is resolved by the caller per request; `None` or a blank
    /// key fails with [`CompletionError::Config`] before any network call.
    async fn complete(
        &self,
        request: &ProviderRequest,
        api_key: Option<&str>,
    ) -> Result<String, CompletionError>;

    /// Model identifier, reported by the health endpoint.
    fn model(&self) -> &str;
}

/// Returns the key if it is present and non-blank.
pub fn require_api_key(api_key: Option<&str>) -> Result<&str, CompletionError> {
    api_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| CompletionError::Config("API key is not set in environment variables".into()))
}
