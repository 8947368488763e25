use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod standings;
mod upstream;

use api::AppState;
use config::Config;
use standings::{start_refresh_scheduler, Acquisition, QueryService, StandingsCache};
use upstream::{HttpFetcher, StandingsSource};

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

    let source: Arc<dyn StandingsSource> = Arc::new(HttpFetcher::new(
        &config.standings_url,
        &config.user_agent,
        config.fetch_timeout(),
    )?);
    info!(
        url = %config.standings_url,
        timeout = ?config.fetch_timeout(),
        "Standings source configured"
    );

    let cache = StandingsCache::new();
    let acquisition = Arc::new(Acquisition::new(source, cache));

    // First tick fires immediately so the cache warms before traffic arrives.
    let _scheduler = start_refresh_scheduler(acquisition.clone(), config.refresh_interval());

    if config.api_secret.is_none() {
        warn!("API_SECRET not set, standings API is open to everyone");
    }

    let state = AppState {
        service: QueryService::new(acquisition),
        api_secret: config.api_secret.clone(),
    };
    let app = api::router(state);
    let addr: SocketAddr = config.api_addr.parse()?;
    info!("Standings API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
