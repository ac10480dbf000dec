// Stochastic Oscillator indicator implementation
use super::sma::sma_of_series;
use super::{finite, window_bounds, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Stochastic {
    name: String,
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self {
            name: format!("STOCH({}, {})", k_period, d_period),
            k_period,
            d_period,
        }
    }
}

impl IndicatorCalculator for Stochastic {
    fn id(&self) -> IndicatorId {
        IndicatorId::Stoch
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "kPeriod": self.k_period, "dPeriod": self.d_period })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        stochastic(data, self.k_period, self.d_period).into_series()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticLines {
    pub k: Series,
    pub d: Series,
}

impl StochasticLines {
    pub fn into_series(self) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::K.to_string(), self.k), (series_keys::D.to_string(), self.d)])
    }
}

/// %K = (close - lowest low) / (highest high - lowest low) * 100 over `k_period` candles,
/// %D = SMA(%K, d_period). A flat window has no range, so %K is undefined there.
pub fn stochastic(data: &[Candle], k_period: usize, d_period: usize) -> StochasticLines {
    let mut k = vec![None; data.len()];
    if k_period > 0 && data.len() >= k_period {
        for (offset, window) in data.windows(k_period).enumerate() {
            let i = offset + k_period - 1;
            let Some((lowest, _)) = window_bounds(window.iter().map(|c| Some(c.low))) else {
                continue;
            };
            let Some((_, highest)) = window_bounds(window.iter().map(|c| Some(c.high))) else {
                continue;
            };
            k[i] = normalize(data[i].close, lowest, highest);
        }
    }
    let d = sma_of_series(&k, d_period);
    StochasticLines { k, d }
}

/// The stochastic formula applied to an arbitrary series instead of price.
/// Every value in the `k_period` window must be defined.
pub fn stochastic_of_series(values: &[Option<f64>], k_period: usize, d_period: usize) -> StochasticLines {
    let mut k = vec![None; values.len()];
    if k_period > 0 && values.len() >= k_period {
        for (offset, window) in values.windows(k_period).enumerate() {
            let i = offset + k_period - 1;
            let (Some((lowest, highest)), Some(current)) = (window_bounds(window.iter().copied()), finite(values[i]))
            else {
                continue;
            };
            k[i] = normalize(current, lowest, highest);
        }
    }
    let d = sma_of_series(&k, d_period);
    StochasticLines { k, d }
}

fn normalize(value: f64, lowest: f64, highest: f64) -> Option<f64> {
    let range = highest - lowest;
    if range <= 0.0 {
        return None;
    }
    finite(Some((finite(Some(value))? - lowest) / range * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::*;

    #[test]
    fn test_stochastic_k_and_d() {
        let candles = vec![
            ohlcv(0.0, 10.0, 0.0, 5.0, 0.0),
            ohlcv(0.0, 10.0, 0.0, 10.0, 0.0),
            ohlcv(0.0, 10.0, 0.0, 0.0, 0.0),
            ohlcv(0.0, 10.0, 0.0, 2.5, 0.0),
        ];
        let lines = stochastic(&candles, 2, 2);
        assert_series_eq(&lines.k, &[None, Some(100.0), Some(0.0), Some(25.0)]);
        assert_series_eq(&lines.d, &[None, None, Some(50.0), Some(12.5)]);
    }

    #[test]
    fn test_stochastic_flat_range_is_undefined() {
        let lines = stochastic(&vec![candle(3.0); 20], 14, 3);
        assert!(lines.k.iter().all(Option::is_none));
        assert!(lines.d.iter().all(Option::is_none));
    }

    #[test]
    fn test_stochastic_stays_within_bounds() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                ohlcv(mid, mid + 2.0, mid - 2.0, mid + (i % 3) as f64 - 1.0, 0.0)
            })
            .collect();
        let series = Stochastic::new(14, 3).calculate(&candles);
        for key in ["k", "d"] {
            assert!(series[key].iter().flatten().all(|v| (0.0..=100.0).contains(v)));
        }
        assert!(series["k"][..13].iter().all(Option::is_none));
        assert!(series["k"][13].is_some());
        assert!(series["d"][15].is_some());
    }

    #[test]
    fn test_stochastic_of_series_requires_full_window() {
        let values = [None, Some(10.0), Some(20.0), Some(15.0), Some(20.0)];
        let lines = stochastic_of_series(&values, 3, 1);
        assert_series_eq(&lines.k, &[None, None, None, Some(50.0), Some(100.0)]);
    }

    #[test]
    fn test_stochastic_empty() {
        let lines = stochastic(&[], 14, 3);
        assert!(lines.k.is_empty() && lines.d.is_empty());
    }
}
