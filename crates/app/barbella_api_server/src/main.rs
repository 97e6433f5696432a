//! Barbella chat API server binary.
//!
//! Serves `POST /api/chat` and `GET /api/hello`. Configuration comes from the
//! environment (and a `.env` file, if present); flags override it.

use std::path::PathBuf;
use std::sync::Arc;

use barbella_api::config::ApiConfig;
use barbella_api::error::StatusMapping;
use barbella_core::completion::config::{CompletionConfig, timeout_from_secs};
use barbella_core::completion::gemini::GeminiClient;
use clap::Parser;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "barbella_api_server", about = "Barbella chat API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR")]
    bind_addr: Option<String>,

    /// Gemini model name.
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Upper bound on one provider call, in seconds.
    #[arg(long, env = "GEMINI_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// File whose contents replace the built-in prompt template.
    #[arg(long, env = "PROMPT_TEMPLATE_PATH")]
    prompt_template: Option<PathBuf>,

    /// Error status mapping: `flat` (every error is 500) or `differentiated`.
    #[arg(long, env = "ERROR_STATUS_MAPPING")]
    status_mapping: Option<StatusMapping>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,barbella_api=debug,barbella_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(path) = args.prompt_template {
        config.prompt_template_path = Some(path);
    }
    if let Some(mapping) = args.status_mapping {
        config.status_mapping = mapping;
    }

    let mut completion_config = CompletionConfig::from_env()?;
    if let Some(model) = args.model {
        completion_config.model = model;
    }
    if let Some(secs) = args.timeout_secs {
        completion_config.timeout = timeout_from_secs(secs)?;
    }

    info!(
        bind_addr = %config.bind_addr,
        model = %completion_config.model,
        timeout_secs = completion_config.timeout.as_secs(),
        status_mapping = ?config.status_mapping,
        "starting barbella_api_server"
    );

    if config.api_key.resolve().is_none() {
        warn!("GEMINI_API_KEY is not set; chat requests will fail until it is");
    }

    let prompt = config.prompt_template()?;
    let completion = Arc::new(GeminiClient::new(completion_config)?);
    let state = barbella_api::AppState::new(config.clone(), prompt, completion);
    let app = barbella_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
