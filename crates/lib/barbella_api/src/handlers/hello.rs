//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloWorldResponse {
    pub greeting: String,
    pub model: String,
    pub api_key_configured: bool,
}

/// `GET /api/hello`: reports the core version, model and key presence.
pub async fn hello_world(State(state): State<AppState>) -> Json<HelloWorldResponse> {
    Json(HelloWorldResponse {
        greeting: barbella_core::hello::hello_world(),
        model: state.completion.model().to_string(),
        api_key_configured: state.config.api_key.resolve().is_some(),
    })
}
