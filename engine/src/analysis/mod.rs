// Post-processing of computed series into annotations for display.
pub mod events;
pub mod insights;
pub mod patterns;
pub mod readings;

pub use events::build_events;
pub use insights::build_insights;
pub use patterns::PatternScanner;
pub use readings::{build_readings, Readings};

use shared::models::{ComputedSeriesMap, IndicatorId, Series};

/// Squeeze threshold: band width below this percentage of the middle band counts as compressed.
pub const SQUEEZE_THRESHOLD_PCT: f64 = 6.0;

pub(crate) fn sub_series<'a>(series: &'a ComputedSeriesMap, id: IndicatorId, key: &str) -> Option<&'a Series> {
    series.get(&id).and_then(|s| s.get(key))
}

/// Value at `index`, treating a missing or short series as undefined.
pub(crate) fn value_at(series: &Series, index: usize) -> Option<f64> {
    series.get(index).copied().flatten().filter(|v| v.is_finite())
}
