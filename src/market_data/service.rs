// =============================================================================
// Market Data Service — cached, failure-collapsing acquisition layer
// =============================================================================
//
// The dashboard consumes acquisition as two calls that either yield data or
// nothing:
//
//   fetch_history(symbol, start, end) -> Option<bars>
//   fetch_metadata(symbol)            -> Option<company info>
//
// Network errors, unknown symbols, empty results and inverted date ranges all
// collapse to `None`; the cause is only logged. Each call has its own TTL
// cache keyed by its arguments, and only successful results are stored.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{MarketDataSource, TtlCache};
use crate::types::{Bar, CompanyInfo};

/// Cache key for a history request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Entry counts for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub history_entries: usize,
    pub company_entries: usize,
}

pub struct MarketDataService {
    source: Arc<dyn MarketDataSource>,
    history_cache: TtlCache<HistoryKey, Arc<Vec<Bar>>>,
    company_cache: TtlCache<String, CompanyInfo>,
}

impl MarketDataService {
    pub fn new(source: Arc<dyn MarketDataSource>, history_ttl: Duration, company_ttl: Duration) -> Self {
        Self {
            source,
            history_cache: TtlCache::new(history_ttl),
            company_cache: TtlCache::new(company_ttl),
        }
    }

    /// Daily bars for `symbol` in `[start, end)`, or `None` when unavailable.
    #[instrument(skip(self), name = "market_data::fetch_history")]
    pub async fn fetch_history(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Option<Arc<Vec<Bar>>> {
        let symbol = normalize_symbol(symbol)?;
        if start > end {
            debug!(%symbol, %start, %end, "inverted date range");
            return None;
        }

        let key = HistoryKey {
            symbol: symbol.clone(),
            start,
            end,
        };
        if let Some(bars) = self.history_cache.get(&key) {
            debug!(%symbol, count = bars.len(), "history cache hit");
            return Some(bars);
        }

        match self.source.history(&symbol, start, end).await {
            Ok(bars) if bars.is_empty() => {
                warn!(%symbol, %start, %end, "history fetch returned no rows");
                None
            }
            Ok(bars) => {
                let bars = Arc::new(bars);
                self.history_cache.insert(key, bars.clone());
                debug!(%symbol, count = bars.len(), "history cached");
                Some(bars)
            }
            Err(e) => {
                warn!(%symbol, error = %e, "history fetch failed");
                None
            }
        }
    }

    /// Company metadata for `symbol`, or `None` when unavailable.
    #[instrument(skip(self), name = "market_data::fetch_metadata")]
    pub async fn fetch_metadata(&self, symbol: &str) -> Option<CompanyInfo> {
        let symbol = normalize_symbol(symbol)?;

        if let Some(info) = self.company_cache.get(&symbol) {
            debug!(%symbol, "company cache hit");
            return Some(info);
        }

        match self.source.company_info(&symbol).await {
            Ok(info) => {
                self.company_cache.insert(symbol, info.clone());
                Some(info)
            }
            Err(e) => {
                warn!(%symbol, error = %e, "company fetch failed");
                None
            }
        }
    }

    /// Drop expired entries from both caches. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.history_cache.purge_expired() + self.company_cache.purge_expired()
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            history_entries: self.history_cache.len(),
            company_entries: self.company_cache.len(),
        }
    }
}

/// Trim and upper-case a ticker symbol.
///
/// `None` when nothing is left or the symbol holds anything other than
/// ASCII letters, digits and `.^=-` (e.g. `ASELS.IS`, `BRK-B`, `^GSPC`,
/// `EURUSD=X`).
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    let valid = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'));
    valid.then_some(symbol)
}
