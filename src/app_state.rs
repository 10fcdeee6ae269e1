// =============================================================================
// Central Application State — Ticker Dashboard
// =============================================================================
//
// Shared by every request handler via `Arc<AppState>`. The only mutable parts
// are the acquisition caches (behind `parking_lot::RwLock` inside
// `MarketDataService`) and an atomic request counter.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};

use crate::market_data::{MarketDataService, MarketDataSource};
use crate::runtime_config::DashboardConfig;

pub struct AppState {
    pub config: DashboardConfig,
    pub market_data: MarketDataService,

    /// Number of dashboards assembled (ready or unavailable).
    pub dashboards_served: AtomicU64,

    /// Instant when the server was started. Used for uptime calculations.
    pub start_time: Instant,
}

impl AppState {
    /// Build state around `source`, with cache horizons taken from `config`.
    pub fn new(config: DashboardConfig, source: Arc<dyn MarketDataSource>) -> Self {
        let market_data = MarketDataService::new(source, config.history_ttl(), config.company_ttl());

        Self {
            config,
            market_data,
            dashboards_served: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_dashboard(&self) -> u64 {
        self.dashboards_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn dashboards_served(&self) -> u64 {
        self.dashboards_served.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// The date default ranges end on.
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
