// =============================================================================
// RSI Chart — oscillator line with overbought / oversold levels
// =============================================================================

use super::{Axis, Figure, Layout, Line, ScatterTrace, Trace};
use crate::indicators::rsi::{OVERBOUGHT, OVERSOLD};
use crate::indicators::series::RSI_PERIOD;
use crate::indicators::{AugmentedSeries, IndicatorColumn};

const HEIGHT: u32 = 300;

/// RSI(14) line with reference levels at 70 and 30, y-axis fixed to [0, 100].
///
/// Returns an empty figure when the RSI column is absent.
pub fn rsi_chart(series: &AugmentedSeries) -> Figure {
    let Some(values) = series.column(IndicatorColumn::Rsi(RSI_PERIOD)) else {
        return Figure::default();
    };

    let mut fig = Figure {
        data: Vec::with_capacity(1),
        layout: Layout::titled("Relative Strength Index (RSI)", "Date", "RSI Value", HEIGHT),
    };
    fig.layout.yaxis = Some(Axis {
        range: Some([0.0, 100.0]),
        ..Axis::titled("RSI Value")
    });

    fig.add_trace(Trace::Scatter(ScatterTrace::lines(
        "RSI",
        series.dates(),
        values.to_vec(),
        Line::solid("purple", None),
    )))
    .add_hline(OVERBOUGHT, "red", "Overbought (70)")
    .add_hline(OVERSOLD, "green", "Oversold (30)");

    fig
}
