//! Gemini completion client.
//!
//! Calls `POST {base}/v1beta/models/{model}:generateContent` once per
//! request. The chat-session shape (history plus one new message) is
//! flattened into a single `contents` list, new message last.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::CompletionConfig;
use super::{CompletionClient, CompletionError, require_api_key};
use crate::adapter::{ProviderRequest, ProviderRole};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: ProviderRole,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Completion client backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: CompletionConfig,
}

impl GeminiClient {
    /// Builds a client whose every call is bounded by `config.timeout`.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn classify(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout(self.config.timeout)
        } else {
            CompletionError::Upstream(format!("Gemini request failed: {e}"))
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(
        &self,
        request: &ProviderRequest,
        api_key: Option<&str>,
    ) -> Result<String, CompletionError> {
        let api_key = require_api_key(api_key)?;
        let body = build_request(request);

        info!(
            model = %self.config.model,
            history_len = request.history.len(),
            "sending request to Gemini"
        );

        let resp = self
            .client
            .post(self.config.generate_content_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Upstream(format!(
                "Gemini generateContent failed: {status} {body}"
            )));
        }

        let data: GenerateContentResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                CompletionError::Upstream(format!("Gemini response parse error: {e}"))
            }
        })?;

        let text = extract_text(data)?;
        debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn build_request(request: &ProviderRequest) -> GenerateContentRequest<'_> {
    let mut contents: Vec<Content<'_>> = request
        .history
        .iter()
        .map(|turn| Content {
            role: turn.role,
            parts: vec![Part { text: &turn.text }],
        })
        .collect();
    contents.push(Content {
        role: ProviderRole::User,
        parts: vec![Part {
            text: &request.new_message,
        }],
    });
    GenerateContentRequest { contents }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, CompletionError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {r}"))
            .unwrap_or_else(|| "Gemini returned no candidates".to_string());
        return Err(CompletionError::Upstream(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(CompletionError::Upstream(format!(
            "Gemini returned an empty candidate (finish reason: {finish})"
        )));
    }
    Ok(text)
}
