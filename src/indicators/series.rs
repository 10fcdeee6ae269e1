// =============================================================================
// Augmented Series — OHLCV bars plus named indicator columns
// =============================================================================
//
// The OHLCV bars are never modified; indicators are appended as columns keyed
// by name (`SMA_20`, `SMA_50`, `RSI_14`), each aligned one-to-one with the
// bars. A column is only appended when the series is at least as long as the
// indicator period, so consumers must treat every column as optional.
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::rsi::{calculate_rsi, zone_label};
use super::sma::calculate_sma;
use crate::types::Bar;

/// Fast moving-average period.
pub const SMA_FAST: usize = 20;
/// Slow moving-average period.
pub const SMA_SLOW: usize = 50;
/// RSI look-back period.
pub const RSI_PERIOD: usize = 14;

/// Name of an indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndicatorColumn {
    Sma(usize),
    Rsi(usize),
}

impl fmt::Display for IndicatorColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sma(n) => write!(f, "SMA_{n}"),
            Self::Rsi(n) => write!(f, "RSI_{n}"),
        }
    }
}

/// One flattened row of an augmented series, as shown in the raw-data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    #[serde(flatten)]
    pub indicators: BTreeMap<String, Option<f64>>,
}

/// OHLCV bars with appended indicator columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedSeries {
    bars: Vec<Bar>,
    columns: BTreeMap<IndicatorColumn, Vec<Option<f64>>>,
}

impl AugmentedSeries {
    /// Wrap bars without any indicator columns.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        Self {
            bars,
            columns: BTreeMap::new(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Look up an indicator column; `None` when it was never appended.
    pub fn column(&self, column: IndicatorColumn) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Names of the appended columns, in a stable order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().map(ToString::to_string).collect()
    }

    /// Append (or replace) the SMA column for `period`.
    ///
    /// Skipped when the series is shorter than `period` or `period` is zero.
    pub fn append_sma(&mut self, period: usize) -> &mut Self {
        if period > 0 && self.bars.len() >= period {
            let values = calculate_sma(&self.closes(), period);
            self.columns.insert(IndicatorColumn::Sma(period), values);
        }
        self
    }

    /// Append (or replace) the RSI column for `period`.
    ///
    /// Skipped when the series is shorter than `period` or `period` is zero.
    pub fn append_rsi(&mut self, period: usize) -> &mut Self {
        if period > 0 && self.bars.len() >= period {
            let values = calculate_rsi(&self.closes(), period);
            self.columns.insert(IndicatorColumn::Rsi(period), values);
        }
        self
    }

    /// Last value of the `RSI_14` column with its zone label; `None` when the
    /// column is absent or its last row is undefined.
    pub fn current_rsi(&self) -> Option<(f64, &'static str)> {
        let value = self.column(IndicatorColumn::Rsi(RSI_PERIOD))?.last().copied().flatten()?;
        Some((value, zone_label(value)))
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn previous_close(&self) -> Option<f64> {
        self.bars.iter().rev().nth(1).map(|b| b.close)
    }

    /// Mean volume of the last `window` rows (fewer when the series is
    /// shorter). `None` for an empty series or a zero window.
    pub fn average_volume(&self, window: usize) -> Option<f64> {
        if window == 0 || self.bars.is_empty() {
            return None;
        }
        let start = self.bars.len().saturating_sub(window);
        let tail = &self.bars[start..];
        Some(tail.iter().map(|b| b.volume as f64).sum::<f64>() / tail.len() as f64)
    }

    /// Flatten rows `start..` into table records.
    pub fn rows_from(&self, start: usize) -> Vec<SeriesRow> {
        (start.min(self.bars.len())..self.bars.len())
            .map(|i| {
                let bar = &self.bars[i];
                let indicators = self
                    .columns
                    .iter()
                    .map(|(name, values)| (name.to_string(), values.get(i).copied().flatten()))
                    .collect();
                SeriesRow {
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    indicators,
                }
            })
            .collect()
    }

    /// The last `n` rows as table records.
    pub fn tail_rows(&self, n: usize) -> Vec<SeriesRow> {
        self.rows_from(self.bars.len().saturating_sub(n))
    }
}

#[cfg(test)]
impl AugmentedSeries {
    pub fn has_column(&self, column: IndicatorColumn) -> bool {
        self.columns.contains_key(&column)
    }

    /// Remove a column, returning its values.
    pub fn remove_column(&mut self, column: IndicatorColumn) -> Option<Vec<Option<f64>>> {
        self.columns.remove(&column)
    }
}

/// Append SMA(20), SMA(50) and RSI(14) to `bars`.
///
/// Total: an empty input yields an empty series without columns.
pub fn calculate_indicators(bars: Vec<Bar>) -> AugmentedSeries {
    let mut series = AugmentedSeries::from_bars(bars);
    series
        .append_sma(SMA_FAST)
        .append_sma(SMA_SLOW)
        .append_rsi(RSI_PERIOD);
    series
}
