// Relative Strength Index (RSI) indicator implementation
use super::{closes, finite, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn id(&self) -> IndicatorId {
        IndicatorId::Rsi
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::VALUE.to_string(), rsi(&closes(data), self.period))])
    }
}

/// RSI from the simple average of the last `period` gains and losses at every index.
///
/// Averages are re-computed over the trailing window rather than Wilder-smoothed, so each value
/// depends only on its own window. The first value lands at index `period`; a window without
/// losses reads exactly 100.
pub fn rsi(values: &[f64], period: usize) -> Series {
    let mut results = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return results;
    }

    for i in period..values.len() {
        results[i] = window_rsi(&values[i - period..=i]);
    }
    results
}

// `window` holds period + 1 closes, i.e. `period` changes.
fn window_rsi(window: &[f64]) -> Option<f64> {
    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = finite(Some(pair[1] - pair[0]))?;
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    let changes = (window.len() - 1) as f64;
    let avg_gain = gains / changes;
    let avg_loss = losses / changes;

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    finite(Some(100.0 - (100.0 / (1.0 + rs))))
}
