mod artwork;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod poems;
mod routes;
mod state;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::artwork::ClevelandArtClient;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::pipeline::generator::PoemPipeline;
use crate::pipeline::identifier::ClockIdAssigner;
use crate::pipeline::styles::{SeededSelector, StyleSelector, ThreadRngSelector};
use crate::poems::store::{InMemoryPoemStore, PgPoemStore, PoemStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::webhook::RebuildNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Poetry API v{}", env!("CARGO_PKG_VERSION"));

    // Poem store: Postgres when configured, otherwise process memory
    let store: Arc<dyn PoemStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgPoemStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; poems will be kept in memory only");
            Arc::new(InMemoryPoemStore::new())
        }
    };

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .context("Failed to build HTTP client")?;

    // Initialize LLM client
    let llm = LlmClient::new(
        http.clone(),
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
    );
    config
        .model
        .validate()
        .context("Invalid POEM_* model parameters")?;
    info!("LLM client initialized (model: {})", config.model.model);

    let artwork = ClevelandArtClient::new(http.clone(), config.artwork_api_url.clone());

    let selector: Arc<dyn StyleSelector> = match config.style_seed {
        Some(seed) => {
            info!("Style selection seeded with {}", seed);
            Arc::new(SeededSelector::new(seed))
        }
        None => Arc::new(ThreadRngSelector),
    };

    let pipeline = PoemPipeline::new(
        Arc::new(artwork),
        Arc::new(llm),
        selector,
        Arc::new(ClockIdAssigner::new()),
        config.styles.clone(),
        config.model.clone(),
    );

    let notifier = RebuildNotifier::new(http, config.rebuild_webhook_url.clone());

    // Build app state
    let state = AppState {
        pipeline,
        store,
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
