mod config;
mod design;
mod errors;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing OPENAI_API_KEY stops startup here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Loyalty Program Design Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize LLM client
    let llm = OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.http_timeout(),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
