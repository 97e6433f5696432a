//! Chat request handler.
//!
//! `POST /api/chat` takes the whole conversation as a JSON array of turns,
//! adapts it for the provider, and answers with the completion as plain
//! text. The server keeps nothing between calls.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use barbella_core::adapter::adapt;
use barbella_core::turn::Turn;
use tracing::{debug, error, info};

use crate::AppState;
use crate::error::AppResult;

/// `POST /api/chat`: forward the conversation to the model provider.
///
/// A body the extractor cannot read (e.g. over the configured size limit)
/// goes through the same error path as every other failure.
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(body) => complete_conversation(&state, &body).await,
        Err(rejection) => Err(rejection.into()),
    };

    match result {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "chat request failed");
            e.into_response_with(state.config.status_mapping)
        }
    }
}

async fn complete_conversation(state: &AppState, body: &[u8]) -> AppResult<String> {
    let turns: Vec<Turn> = serde_json::from_slice(body)?;
    info!(turns = turns.len(), "chat request received");

    let request = adapt(&turns, &state.prompt)?;

    let api_key = state.config.api_key.resolve();
    debug!(api_key_set = api_key.is_some(), "resolved provider API key");

    let text = state
        .completion
        .complete(&request, api_key.as_deref())
        .await?;
    info!(chars = text.len(), "chat completion returned");
    Ok(text)
}
