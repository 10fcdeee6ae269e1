//! In-memory [`MarketDataSource`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use super::MarketDataSource;
use crate::types::{Bar, CompanyInfo};

/// Serves fixed bars and metadata for a single symbol; any other symbol is an
/// error, like an unknown ticker upstream.
pub struct FakeSource {
    symbol: String,
    bars: Vec<Bar>,
    info: CompanyInfo,
    history_calls: AtomicUsize,
    company_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(symbol: &str, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.to_string(),
            bars,
            info: CompanyInfo {
                name: format!("{symbol} Corp"),
                sector: "Technology".to_string(),
                industry: "Software".to_string(),
                market_cap: 2_500_000_000_000.0,
            },
            history_calls: AtomicUsize::new(0),
            company_calls: AtomicUsize::new(0),
        }
    }

    /// Consecutive daily bars from 2024-01-01 with the given closes and a
    /// volume of `1_000 * (row + 1)`.
    pub fn with_closes(symbol: &str, closes: &[f64]) -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Bar::new(
                    start + Duration::days(i as i64),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    1_000 * (i as u64 + 1),
                )
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn company_calls(&self) -> usize {
        self.company_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn history(&self, symbol: &str, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<Bar>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if symbol != self.symbol {
            anyhow::bail!("No data found, symbol may be delisted: {symbol}");
        }
        Ok(self.bars.clone())
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        self.company_calls.fetch_add(1, Ordering::SeqCst);
        if symbol != self.symbol {
            anyhow::bail!("Quote not found for symbol: {symbol}");
        }
        Ok(self.info.clone())
    }
}
