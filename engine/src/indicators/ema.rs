// Exponential Moving Average (EMA) indicator implementation
use super::{closes, finite, to_options, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn id(&self) -> IndicatorId {
        IndicatorId::Ema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::VALUE.to_string(), ema(&closes(data), self.period))])
    }
}

/// EMA seeded with the SMA of the first `period` values, then `(x - prev) * 2/(period+1) + prev`.
pub fn ema(values: &[f64], period: usize) -> Series {
    ema_of_series(&to_options(values), period)
}

/// EMA over a series with gaps. Undefined or non-finite samples are skipped: they stay `None`
/// in the output and neither count towards the seed window nor move the average.
pub fn ema_of_series(values: &[Option<f64>], period: usize) -> Series {
    let mut results = vec![None; values.len()];
    if period == 0 {
        return results;
    }
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut seed_sum = 0.0;
    let mut seed_count = 0;
    let mut previous_ema: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(value) = finite(*value) else {
            continue;
        };
        match previous_ema {
            Some(prev) => {
                let ema = (value - prev) * multiplier + prev;
                previous_ema = finite(Some(ema));
                results[i] = previous_ema;
            }
            None => {
                seed_sum += value;
                seed_count += 1;
                if seed_count == period {
                    previous_ema = finite(Some(seed_sum / period as f64));
                    results[i] = previous_ema;
                }
            }
        }
    }
    results
}
