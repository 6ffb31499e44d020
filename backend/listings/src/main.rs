//! Nyumba listings API: entry point.
//!
//! Serves property reads from the configured fullnode and hands out unsigned
//! contract calls for browser wallets to execute.

use std::sync::Arc;

use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use listings::api::{self, ApiState};
use listings::{Config, PropertyService, SignerSlot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // One HTTP client for every ledger request.
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()?;

    // The server holds no wallet, so its session stays disconnected.
    let signers = SignerSlot::new();
    let service = PropertyService::from_config(&config, client, signers.session());

    info!(
        "Reading package {} on {} ({})",
        config.package_id,
        config.network,
        config.rpc_url()
    );

    let app = api::router(Arc::new(ApiState { service }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
