// =============================================================================
// Market Data Source — abstraction over the remote data vendor
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{Bar, CompanyInfo};

/// A remote provider of daily bars and company metadata.
///
/// Implementations report failures as errors; [`MarketDataService`] decides
/// how they surface to the dashboard.
///
/// [`MarketDataService`]: super::MarketDataService
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for `symbol` from `start` (inclusive) to `end` (exclusive),
    /// ordered by date.
    async fn history(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>>;

    /// Descriptive metadata for `symbol`.
    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo>;
}
