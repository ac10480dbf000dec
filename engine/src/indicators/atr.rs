// Average True Range (ATR) indicator implementation
use super::{to_options, window_mean, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Atr {
    name: String,
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ATR({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Atr {
    fn id(&self) -> IndicatorId {
        IndicatorId::Atr
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::VALUE.to_string(), atr(data, self.period))])
    }
}

/// TR = max(high - low, |high - prev close|, |low - prev close|); the first candle uses high - low.
/// Candles with a non-finite input produce NaN here and are screened out by the windowing.
pub fn true_range(data: &[Candle]) -> Vec<f64> {
    data.iter()
        .enumerate()
        .map(|(i, candle)| {
            let high_low = candle.high - candle.low;
            if i == 0 {
                return high_low;
            }
            let prev_close = data[i - 1].close;
            if !(candle.high.is_finite() && candle.low.is_finite() && prev_close.is_finite()) {
                return f64::NAN;
            }
            high_low
                .max((candle.high - prev_close).abs())
                .max((candle.low - prev_close).abs())
        })
        .collect()
}

/// Simple average of the trailing `period` true ranges, defined from index `period` onwards.
pub fn atr(data: &[Candle], period: usize) -> Series {
    let mut results = vec![None; data.len()];
    if period == 0 || data.len() <= period {
        return results;
    }
    let tr = to_options(&true_range(data));
    for i in period..data.len() {
        results[i] = window_mean(&tr[i + 1 - period..=i]);
    }
    results
}
