// =============================================================================
// Volume Chart — daily volume bars
// =============================================================================

use super::{BarTrace, Figure, Layout, Marker, Trace};
use crate::indicators::AugmentedSeries;

const HEIGHT: u32 = 300;
const BAR_COLOR: &str = "rgba(150, 150, 150, 0.5)";

/// Bar chart of daily traded volume.
pub fn volume_chart(series: &AugmentedSeries) -> Figure {
    let mut fig = Figure {
        data: Vec::with_capacity(1),
        layout: Layout::titled("Daily Volume", "Date", "Volume", HEIGHT),
    };

    fig.add_trace(Trace::Bar(BarTrace {
        name: "Volume".to_string(),
        x: series.dates(),
        y: series.bars().iter().map(|b| b.volume as f64).collect(),
        marker: Marker {
            color: BAR_COLOR.to_string(),
        },
    }));

    fig
}
