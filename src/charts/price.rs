// =============================================================================
// Price Chart — candlesticks with moving-average overlays
// =============================================================================

use super::{Axis, CandlestickTrace, Figure, Layout, Line, RangeSlider, ScatterTrace, Trace};
use crate::indicators::series::{SMA_FAST, SMA_SLOW};
use crate::indicators::{AugmentedSeries, IndicatorColumn};

const HEIGHT: u32 = 550;

/// Candlestick chart for `symbol` with SMA-20 (blue) and SMA-50 (red) lines.
///
/// Each overlay is silently omitted when its column is absent.
pub fn price_chart(series: &AugmentedSeries, symbol: &str) -> Figure {
    let bars = series.bars();
    let dates = series.dates();

    let mut fig = Figure {
        data: Vec::with_capacity(3),
        layout: Layout {
            hovermode: Some("x unified".to_string()),
            ..Layout::titled(
                &format!("{symbol} Price and Moving Averages"),
                "Date",
                "Price ($)",
                HEIGHT,
            )
        },
    };
    fig.layout.xaxis = Some(Axis {
        rangeslider: Some(RangeSlider { visible: false }),
        ..Axis::titled("Date")
    });

    fig.add_trace(Trace::Candlestick(CandlestickTrace {
        name: format!("{symbol} Price"),
        x: dates.clone(),
        open: bars.iter().map(|b| b.open).collect(),
        high: bars.iter().map(|b| b.high).collect(),
        low: bars.iter().map(|b| b.low).collect(),
        close: bars.iter().map(|b| b.close).collect(),
    }));

    let overlays = [(SMA_FAST, "SMA 20", "blue"), (SMA_SLOW, "SMA 50", "red")];
    for (period, name, color) in overlays {
        if let Some(values) = series.column(IndicatorColumn::Sma(period)) {
            fig.add_trace(Trace::Scatter(ScatterTrace::lines(
                name,
                dates.clone(),
                values.to_vec(),
                Line::solid(color, Some(1.0)),
            )));
        }
    }

    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::calculate_indicators;
    use crate::types::Bar;
    use chrono::{Duration, NaiveDate};

    fn series(len: usize) -> AugmentedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..len)
            .map(|i| {
                let c = 100.0 + i as f64;
                Bar::new(start + Duration::days(i as i64), c - 0.5, c + 1.0, c - 1.0, c, 500)
            })
            .collect();
        calculate_indicators(bars)
    }

    fn trace_names(fig: &Figure) -> Vec<&str> {
        fig.data
            .iter()
            .map(|t| match t {
                Trace::Candlestick(c) => c.name.as_str(),
                Trace::Scatter(s) => s.name.as_str(),
                Trace::Bar(b) => b.name.as_str(),
            })
            .collect()
    }

    #[test]
    fn full_series_has_candles_and_both_overlays() {
        let fig = price_chart(&series(60), "MSFT");
        assert_eq!(trace_names(&fig), vec!["MSFT Price", "SMA 20", "SMA 50"]);

        match &fig.data[0] {
            Trace::Candlestick(c) => {
                assert_eq!(c.x.len(), 60);
                assert_eq!(c.close[59], 159.0);
                assert_eq!(c.open[0], 99.5);
            }
            other => panic!("expected candlestick, got {other:?}"),
        }
        match &fig.data[2] {
            Trace::Scatter(s) => {
                assert_eq!(s.line.color.as_deref(), Some("red"));
                assert!(s.y[48].is_none());
                assert!(s.y[49].is_some());
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn missing_overlay_columns_are_skipped() {
        let fig = price_chart(&series(30), "TSLA");
        assert_eq!(trace_names(&fig), vec!["TSLA Price", "SMA 20"]);

        let mut bare = series(60);
        bare.remove_column(IndicatorColumn::Sma(SMA_FAST));
        bare.remove_column(IndicatorColumn::Sma(SMA_SLOW));
        assert_eq!(price_chart(&bare, "TSLA").data.len(), 1);
    }

    #[test]
    fn layout_matches_dashboard_style() {
        let fig = price_chart(&series(5), "AAPL");
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["layout"]["title"]["text"], "AAPL Price and Moving Averages");
        assert_eq!(json["layout"]["height"], 550);
        assert_eq!(json["layout"]["hovermode"], "x unified");
        assert_eq!(json["layout"]["xaxis"]["rangeslider"]["visible"], false);
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "Price ($)");
    }

    #[test]
    fn empty_series_yields_empty_candlestick() {
        let fig = price_chart(&AugmentedSeries::default(), "X");
        assert_eq!(fig.data.len(), 1);
    }
}
