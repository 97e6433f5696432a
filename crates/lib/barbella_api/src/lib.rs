//! # barbella_api
//!
//! HTTP API library for the Barbella support chat.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use barbella_core::completion::CompletionClient;
use barbella_core::prompt::PromptTemplate;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, hello};

/// Route paths served by [`router`].
pub mod routes {
    pub const POST_API_CHAT: &str = "/api/chat";
    pub const GET_API_HELLO: &str = "/api/hello";
}

/// Shared application state passed to all handlers.
///
/// Holds no conversation state: every chat request carries its full history.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Instruction text prepended to every conversation.
    pub prompt: Arc<PromptTemplate>,
    /// Model provider client.
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        prompt: PromptTemplate,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            prompt: Arc::new(prompt),
            completion,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route(routes::GET_API_HELLO, get(hello::hello_world))
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}
