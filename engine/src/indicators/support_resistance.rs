// Support/Resistance levels: rolling lowest low and highest high.
use super::{window_bounds, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

/// Trailing window, in candles, that a level must have held over.
pub const LEVEL_LOOKBACK: usize = 20;

pub struct SupportResistance {
    lookback: usize,
}

impl SupportResistance {
    pub fn new() -> Self {
        Self { lookback: LEVEL_LOOKBACK }
    }
}

impl Default for SupportResistance {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorCalculator for SupportResistance {
    fn id(&self) -> IndicatorId {
        IndicatorId::SupportResistance
    }

    fn name(&self) -> &str {
        "Support/Resistance"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({})
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        let (support, resistance) = levels(data, self.lookback);
        IndicatorSeries::from([
            (series_keys::SUPPORT.to_string(), support),
            (series_keys::RESISTANCE.to_string(), resistance),
        ])
    }
}

pub fn levels(data: &[Candle], lookback: usize) -> (Series, Series) {
    let mut support = vec![None; data.len()];
    let mut resistance = vec![None; data.len()];
    if lookback == 0 || data.len() < lookback {
        return (support, resistance);
    }
    for (offset, window) in data.windows(lookback).enumerate() {
        let i = offset + lookback - 1;
        support[i] = window_bounds(window.iter().map(|c| Some(c.low))).map(|(lo, _)| lo);
        resistance[i] = window_bounds(window.iter().map(|c| Some(c.high))).map(|(_, hi)| hi);
    }
    (support, resistance)
}
