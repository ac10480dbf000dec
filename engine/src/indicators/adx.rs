// Trend-strength gauge published under the ADX id.
//
// This is a bounded transform of ATR relative to price, not Wilder's +DI/-DI/DX smoothing:
// value = clamp(20 + ATR / close * 1000, 10, 50), defined from index `2 * period`.
use super::atr::atr;
use super::{finite, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

const BASELINE: f64 = 20.0;
const SCALE: f64 = 1000.0;
const FLOOR: f64 = 10.0;
const CEILING: f64 = 50.0;

pub struct Adx {
    name: String,
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ADX({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Adx {
    fn id(&self) -> IndicatorId {
        IndicatorId::Adx
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::VALUE.to_string(), adx(data, self.period))])
    }
}

pub fn adx(data: &[Candle], period: usize) -> Series {
    let mut results = vec![None; data.len()];
    if period == 0 {
        return results;
    }
    let atr_values = atr(data, period);
    let start = period.saturating_mul(2);

    for i in start..data.len() {
        let close = data[i].close;
        if close == 0.0 {
            continue;
        }
        results[i] = atr_values[i]
            .and_then(|a| finite(Some(a / close * SCALE)))
            .map(|strength| (BASELINE + strength).clamp(FLOOR, CEILING));
    }
    results
}
