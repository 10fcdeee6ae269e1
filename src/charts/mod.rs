// =============================================================================
// Chart Figures — plotly.js-compatible figure model
// =============================================================================
//
// Chart shaping is a pure projection of an `AugmentedSeries` into `Figure`
// values. A `Figure` serialises to the `{ data, layout }` JSON object that
// `Plotly.newPlot` accepts, so the browser renders it as-is.
// =============================================================================

pub mod price;
pub mod rsi;
pub mod volume;

pub use price::price_chart;
pub use rsi::rsi_chart;
pub use volume::volume_chart;

use chrono::NaiveDate;
use serde::Serialize;

/// A complete chart: traces plus layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn add_trace(&mut self, trace: Trace) -> &mut Self {
        self.data.push(trace);
        self
    }

    /// Draw a dashed horizontal line across the full plot width at `y`, with a
    /// right-aligned label.
    pub fn add_hline(&mut self, y: f64, color: &str, label: &str) -> &mut Self {
        self.layout.shapes.push(Shape {
            kind: "line",
            xref: "paper",
            yref: "y",
            x0: 0.0,
            x1: 1.0,
            y0: y,
            y1: y,
            line: Line {
                color: Some(color.to_string()),
                width: None,
                dash: Some("dash".to_string()),
            },
        });
        self.layout.annotations.push(Annotation {
            xref: "paper",
            yref: "y",
            x: 1.0,
            y,
            text: label.to_string(),
            showarrow: false,
            xanchor: "right",
            yanchor: "bottom",
        });
        self
    }
}

// =============================================================================
// Traces
// =============================================================================

/// One data series within a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Scatter(ScatterTrace),
    Bar(BarTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<NaiveDate>,
    /// Undefined rows serialise as `null` and render as gaps.
    pub y: Vec<Option<f64>>,
    pub line: Line,
}

impl ScatterTrace {
    /// A `lines` trace over `x`/`y`.
    pub fn lines(name: &str, x: Vec<NaiveDate>, y: Vec<Option<f64>>, line: Line) -> Self {
        Self {
            name: name.to_string(),
            mode: "lines",
            x,
            y,
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Line {
    pub fn solid(color: &str, width: Option<f64>) -> Self {
        Self {
            color: Some(color.to_string()),
            width,
            dash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Layout {
    /// Layout with a title, axis titles and a fixed height.
    pub fn titled(title: &str, x_title: &str, y_title: &str, height: u32) -> Self {
        Self {
            title: Some(Title::new(title)),
            xaxis: Some(Axis::titled(x_title)),
            yaxis: Some(Axis::titled(y_title)),
            height: Some(height),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: Some(Title::new(text)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub showarrow: bool,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
}
