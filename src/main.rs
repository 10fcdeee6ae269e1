// =============================================================================
// Ticker Dashboard — Main Entry Point
// =============================================================================
//
// Serves a single-page stock dashboard: daily OHLCV history and company
// metadata fetched from Yahoo Finance, SMA/RSI overlays, and plotly-ready
// price, RSI and volume figures.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod charts;
mod dashboard;
mod indicators;
mod market_data;
mod runtime_config;
mod types;

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::YahooClient;
use crate::runtime_config::{DashboardConfig, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Ticker Dashboard — Starting Up                    ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = DashboardConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        DashboardConfig::default()
    });
    config.apply_overrides(|key| std::env::var(key).ok());

    info!(
        default_symbol = %config.default_symbol,
        lookback_days = config.default_lookback_days,
        history_ttl_secs = config.history_ttl_secs,
        company_ttl_secs = config.company_ttl_secs,
        "Dashboard defaults"
    );

    // ── 2. Build the upstream client and shared state ────────────────────
    let yahoo = YahooClient::new(&config.yahoo_base_url, config.request_timeout())?;
    info!(base_url = %config.yahoo_base_url, "Yahoo Finance client ready");

    let purge_every = config.cache_purge_interval();
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, Arc::new(yahoo)));

    // ── 3. Cache purge loop ──────────────────────────────────────────────
    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        // The first tick completes immediately; skip it.
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = purge_state.market_data.purge_expired();
            let stats = purge_state.market_data.cache_stats();
            debug!(
                removed,
                history_entries = stats.history_entries,
                company_entries = stats.company_entries,
                "cache purge"
            );
        }
    });

    // ── 4. Start the API server ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Dashboard listening");

    let app = api::rest::router(state.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 5. Wait for shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    info!(
        uptime_secs = state.uptime_secs(),
        dashboards_served = state.dashboards_served(),
        "Shutdown signal received"
    );

    Ok(())
}
