use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cultureai_api::config::{Config, KeySelection};
use cultureai_api::llm_client::credentials::{
    CredentialPool, KeyRing, KeySelector, RandomSelector, RoundRobinSelector,
};
use cultureai_api::llm_client::{self, LlmClient};
use cultureai_api::report::laws::CountryLawTable;
use cultureai_api::routes::build_router;
use cultureai_api::scraper::http::HttpLauncher;
use cultureai_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CultureAI API v{}", env!("CARGO_PKG_VERSION"));

    let laws = match &config.law_table_path {
        Some(path) => CountryLawTable::from_path(path)
            .with_context(|| format!("loading law table from {}", path.display()))?,
        None => CountryLawTable::default(),
    };
    info!("Law table loaded ({} countries)", laws.len());

    let llm = LlmClient::new(config.api_base.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // A missing pool is not fatal; each relay request reports it instead.
    let pool = CredentialPool::parse(config.api_keys.as_deref());
    match &pool {
        Ok(pool) => info!("Credential pool loaded ({} keys)", pool.len()),
        Err(e) => warn!("{e}; relay endpoints will fail until it is set"),
    }
    let selector: Arc<dyn KeySelector> = match config.key_selection {
        KeySelection::Random => Arc::new(RandomSelector),
        KeySelection::RoundRobin => Arc::new(RoundRobinSelector::default()),
    };

    let state = AppState {
        llm,
        keys: KeyRing::new(pool, selector),
        browser: Arc::new(HttpLauncher),
        laws: Arc::new(laws),
        config: config.clone(),
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
