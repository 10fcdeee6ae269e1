// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// dashboard. Series functions return one `Option<f64>` per input close so the
// leading window is explicitly undefined rather than zero-filled.

pub mod rsi;
pub mod series;
pub mod sma;

pub use series::{calculate_indicators, AugmentedSeries, IndicatorColumn, SeriesRow};
