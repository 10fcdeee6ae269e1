// =============================================================================
// Dashboard — assembles one symbol's view from acquisition + indicators
// =============================================================================
//
// acquisition -> indicator computation -> chart shaping -> presentation
//
// Either both the price history and the company metadata are available and a
// full `DashboardView` is produced, or the response is the single generic
// "data unavailable" outcome. Callers never learn why data was unavailable.
// =============================================================================

use std::fmt::Display;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::charts::{price_chart, rsi_chart, volume_chart, Figure};
use crate::indicators::{calculate_indicators, AugmentedSeries, SeriesRow};
use crate::market_data::MarketDataService;
use crate::runtime_config::DashboardConfig;
use crate::types::CompanyInfo;

// =============================================================================
// Query
// =============================================================================

/// Raw user input; every field optional. An empty date (a cleared date
/// input sends `start=`) counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end: Option<NaiveDate>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(de::Error::custom),
    }
}

/// A query with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DashboardQuery {
    /// Fill in the default symbol and `[today - lookback, today]` range.
    /// The symbol is upper-cased; a blank symbol is kept blank.
    pub fn resolve(&self, config: &DashboardConfig, today: NaiveDate) -> ResolvedQuery {
        let symbol = self
            .symbol
            .as_deref()
            .unwrap_or(&config.default_symbol)
            .trim()
            .to_uppercase();
        let end = self.end.unwrap_or(today);
        let start = self
            .start
            .unwrap_or_else(|| today - Duration::days(config.default_lookback_days));

        ResolvedQuery { symbol, start, end }
    }
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResponse {
    Ok(Box<DashboardView>),
    Unavailable { symbol: String, message: String },
}

impl DashboardResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub company: CompanyCard,
    pub metrics: KeyMetrics,
    pub charts: DashboardCharts,
    /// Indicator columns present in the augmented series.
    pub columns: Vec<String>,
    /// Trailing rows for the raw-data table.
    pub recent_rows: Vec<SeriesRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCard {
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub market_cap: f64,
    pub market_cap_display: String,
}

impl From<&CompanyInfo> for CompanyCard {
    fn from(info: &CompanyInfo) -> Self {
        Self {
            name: info.name.clone(),
            sector: info.sector.clone(),
            industry: info.industry.clone(),
            market_cap: info.market_cap,
            market_cap_display: info.market_cap_display(),
        }
    }
}

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub latest_close: f64,
    /// Absent when the series has a single row.
    pub previous_close: Option<f64>,
    pub price_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub average_volume: Option<f64>,
    pub average_volume_window: usize,
    pub rsi: Option<f64>,
    pub rsi_zone: Option<&'static str>,
}

impl KeyMetrics {
    /// `None` for an empty series.
    pub fn from_series(series: &AugmentedSeries, volume_window: usize) -> Option<Self> {
        let latest_close = series.latest_close()?;
        let previous_close = series.previous_close();
        let price_change = previous_close.map(|prev| latest_close - prev);
        let percent_change = previous_close
            .zip(price_change)
            .filter(|(prev, _)| *prev != 0.0)
            .map(|(prev, change)| change / prev * 100.0);
        let rsi = series.current_rsi();

        Some(Self {
            latest_close,
            previous_close,
            price_change,
            percent_change,
            average_volume: series.average_volume(volume_window),
            average_volume_window: volume_window,
            rsi: rsi.map(|(value, _)| value),
            rsi_zone: rsi.map(|(_, zone)| zone),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub price: Figure,
    pub rsi: Figure,
    pub volume: Figure,
}

impl DashboardCharts {
    pub fn from_series(series: &AugmentedSeries, symbol: &str) -> Self {
        Self {
            price: price_chart(series, symbol),
            rsi: rsi_chart(series),
            volume: volume_chart(series),
        }
    }
}

/// The one message shown for every acquisition failure.
pub fn unavailable_message(symbol: &str) -> String {
    format!(
        "No data found for '{symbol}' or it could not be fetched. \
         Check the symbol (e.g. GOOGL, TSLA) or shorten the date range."
    )
}

fn unavailable(symbol: &str) -> DashboardResponse {
    DashboardResponse::Unavailable {
        symbol: symbol.to_string(),
        message: unavailable_message(symbol),
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Fetch, compute and shape everything the dashboard page displays.
pub async fn build_dashboard(
    service: &MarketDataService,
    query: &ResolvedQuery,
    config: &DashboardConfig,
) -> DashboardResponse {
    let symbol = query.symbol.as_str();

    let (history, company) = tokio::join!(
        service.fetch_history(symbol, query.start, query.end),
        service.fetch_metadata(symbol),
    );

    let (Some(bars), Some(company)) = (history, company) else {
        warn!(symbol, start = %query.start, end = %query.end, "dashboard data unavailable");
        return unavailable(symbol);
    };

    let series = calculate_indicators(bars.to_vec());
    if series.is_empty() {
        return unavailable(symbol);
    }
    let Some(metrics) = KeyMetrics::from_series(&series, config.volume_average_window) else {
        return unavailable(symbol);
    };
    let charts = DashboardCharts::from_series(&series, symbol);

    info!(
        symbol,
        rows = series.len(),
        columns = ?series.column_names(),
        rsi_chart = !charts.rsi.is_empty(),
        "dashboard built"
    );

    DashboardResponse::Ok(Box::new(DashboardView {
        symbol: symbol.to_string(),
        start: query.start,
        end: query.end,
        company: CompanyCard::from(&company),
        metrics,
        charts,
        columns: series.column_names(),
        recent_rows: series.tail_rows(config.raw_rows),
    }))
}
