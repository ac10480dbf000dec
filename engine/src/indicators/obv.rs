// On-Balance Volume (OBV) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Obv
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorCalculator for Obv {
    fn id(&self) -> IndicatorId {
        IndicatorId::Obv
    }

    fn name(&self) -> &str {
        "OBV"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({})
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::VALUE.to_string(), obv(data))])
    }
}

/// Running volume total: starts at the first volume, adds volume on up closes and subtracts it on
/// down closes. A candle with a non-finite close or volume is left `None` and does not move the total.
pub fn obv(data: &[Candle]) -> Series {
    let mut results = Vec::with_capacity(data.len());
    let mut total: Option<f64> = None;
    let mut previous_close: Option<f64> = None;

    for candle in data {
        if !(candle.close.is_finite() && candle.volume.is_finite()) {
            results.push(None);
            continue;
        }
        let next = match (total, previous_close) {
            (Some(t), Some(prev)) if candle.close > prev => t + candle.volume,
            (Some(t), Some(prev)) if candle.close < prev => t - candle.volume,
            (Some(t), _) => t,
            (None, _) => candle.volume,
        };
        total = Some(next).filter(|v| v.is_finite());
        previous_close = Some(candle.close);
        results.push(total);
    }
    results
}
