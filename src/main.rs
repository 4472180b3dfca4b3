use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod dashboard;
mod gateway;
mod models;
mod view;

use config::Config;
use dashboard::{AppState, Session};
use gateway::{PredictionClient, PredictionSource};
use view::Action;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = PredictionClient::new(&config.api_base, config.request_timeout())?;
    info!("Prediction service: {}", config.api_base);

    match client.health().await {
        Ok(true) => info!("Prediction service is healthy"),
        Ok(false) => warn!("Prediction service health check did not report ok"),
        Err(e) => warn!("Prediction service unreachable at startup: {}", e),
    }

    let source: Arc<dyn PredictionSource> = Arc::new(client);
    let session = Session::new(source);

    // Initial load with the configured filters
    let initial = config.initial_filters();
    if initial.is_unconstrained() {
        info!("Loading all predictions");
    } else {
        info!("Loading predictions with filters {:?}", initial.query_params());
    }
    session.dispatch(Action::SetFilters(initial)).await;

    let app = dashboard::router(AppState { session });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await?;

    Ok(())
}
