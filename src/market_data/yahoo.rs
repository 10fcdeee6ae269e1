// =============================================================================
// Yahoo Finance REST Client — daily chart bars and company profile
// =============================================================================
//
// Public, unauthenticated endpoints:
//   GET /v8/finance/chart/{symbol}?period1&period2&interval=1d
//   GET /v10/finance/quoteSummary/{symbol}?modules=price,assetProfile
//
// Yahoo rejects requests without a browser-like User-Agent, so one is set as a
// default header on the underlying client.
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::MarketDataSource;
use crate::types::{Bar, CompanyInfo, UNKNOWN};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) ticker-dashboard/0.1";

/// Yahoo Finance HTTP client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client against `base_url` (e.g. `https://query1.finance.yahoo.com`)
    /// with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid Yahoo base url {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Yahoo base url {base_url} cannot carry a path");
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    // -------------------------------------------------------------------------
    // Endpoints
    // -------------------------------------------------------------------------

    /// GET /v8/finance/chart/{symbol}: daily bars in `[start, end)`.
    #[instrument(skip(self), name = "yahoo::get_chart")]
    pub async fn get_chart(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>> {
        let url = self.chart_url(symbol, start, end)?;
        let body = self.get_text(url, "chart").await?;
        let bars = parse_chart_response(&body)?;

        debug!(symbol, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }

    /// GET /v10/finance/quoteSummary/{symbol}: name, sector, industry, market cap.
    #[instrument(skip(self), name = "yahoo::get_quote_summary")]
    pub async fn get_quote_summary(&self, symbol: &str) -> Result<CompanyInfo> {
        let url = self.quote_summary_url(symbol)?;
        let body = self.get_text(url, "quoteSummary").await?;
        let info = parse_quote_summary(&body)?;

        debug!(symbol, name = %info.name, "company profile fetched");
        Ok(info)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Url> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();

        let mut url = self.endpoint(&["v8", "finance", "chart"], symbol)?;
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }

    fn quote_summary_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self.endpoint(&["v10", "finance", "quoteSummary"], symbol)?;
        url.query_pairs_mut()
            .append_pair("modules", "price,assetProfile");
        Ok(url)
    }

    /// `base_url` + `path` + `symbol`, with the symbol escaped as a single
    /// path segment.
    fn endpoint(&self, path: &[&str], symbol: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("Yahoo base url {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(path)
            .push(symbol);
        Ok(url)
    }

    async fn get_text(&self, url: Url, endpoint: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {endpoint} request failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read {endpoint} response body"))?;

        if !status.is_success() {
            anyhow::bail!("Yahoo GET {endpoint} returned {status}: {body}");
        }

        Ok(body)
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    async fn history(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>> {
        self.get_chart(symbol, start, end).await
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        self.get_quote_summary(symbol).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

// =============================================================================
// Chart response
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    symbol: String,
    /// Exchange offset from UTC in seconds; bars are stamped at the session
    /// open in exchange time.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

/// Parse a `/v8/finance/chart` body into bars sorted by date.
///
/// Rows with any null field are skipped; duplicate dates keep the first row.
/// A missing `timestamp` array (no trading days in range) yields no bars.
pub fn parse_chart_response(body: &str) -> Result<Vec<Bar>> {
    let resp: ChartResponse = serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = resp.chart.error {
        anyhow::bail!("Yahoo chart error {}: {}", err.code, err.description);
    }

    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("chart response has no result")?;

    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten().filter(|x| x.is_finite());
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) else {
            skipped += 1;
            continue;
        };

        let Some(stamp) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            skipped += 1;
            continue;
        };

        bars.push(Bar::new(
            stamp.date_naive(),
            open,
            high,
            low,
            close,
            volume.max(0.0).round() as u64,
        ));
    }

    if skipped > 0 {
        warn!(symbol = %result.meta.symbol, skipped, "skipped incomplete chart rows");
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by(|later, earlier| later.date == earlier.date);

    Ok(bars)
}

// =============================================================================
// Quote summary response
// =============================================================================

/// Parse a `/v10/finance/quoteSummary` body (`price` + `assetProfile` modules).
///
/// Missing text fields become `"Unknown"`, a missing market cap becomes 0.
pub fn parse_quote_summary(body: &str) -> Result<CompanyInfo> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("failed to parse quoteSummary response")?;
    let summary = &value["quoteSummary"];

    if let Some(err) = summary["error"].as_object() {
        let description = err
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error");
        anyhow::bail!("Yahoo quoteSummary error: {description}");
    }

    let result = summary["result"]
        .as_array()
        .and_then(|arr| arr.first())
        .context("symbol not found in quoteSummary response")?;

    let price = &result["price"];
    let profile = &result["assetProfile"];

    let text = |v: &serde_json::Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let name = text(&price["longName"])
        .or_else(|| text(&price["shortName"]))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let sector = text(&profile["sector"]).unwrap_or_else(|| UNKNOWN.to_string());
    let industry = text(&profile["industry"]).unwrap_or_else(|| UNKNOWN.to_string());
    let market_cap = price["marketCap"]["raw"]
        .as_f64()
        .or_else(|| price["marketCap"].as_f64())
        .unwrap_or(0.0);

    Ok(CompanyInfo {
        name,
        sector,
        industry,
        market_cap,
    })
}
