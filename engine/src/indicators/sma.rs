// Simple Moving Average (SMA) indicator implementation
use super::{closes, to_options, window_mean, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn id(&self) -> IndicatorId {
        IndicatorId::Sma
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries::from([(series_keys::VALUE.to_string(), sma(&closes(data), self.period))])
    }
}

/// Arithmetic mean over the trailing `period` values; the first `period - 1` entries stay `None`.
pub fn sma(values: &[f64], period: usize) -> Series {
    sma_of_series(&to_options(values), period)
}

/// SMA over a series that may itself have gaps. A window containing a gap yields `None`.
pub fn sma_of_series(values: &[Option<f64>], period: usize) -> Series {
    let mut results = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return results;
    }
    for (offset, window) in values.windows(period).enumerate() {
        results[offset + period - 1] = window_mean(window);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::*;

    #[test]
    fn test_sma_calculation() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = Sma::new(3).calculate(&candles);
        // expected: None, None, (1+2+3)/3=2.0, (2+3+4)/3=3.0, (3+4+5)/3=4.0
        assert_series_eq(&results["value"], &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_defined_suffix_length() {
        let values: Vec<f64> = (0..25).map(|i| i as f64 * 1.5).collect();
        for period in 1..=25 {
            let results = sma(&values, period);
            assert_eq!(results.len(), 25);
            assert!(results[..period - 1].iter().all(Option::is_none));
            assert_eq!(results.iter().flatten().count(), 25 - period + 1);
        }
    }

    #[test]
    fn test_sma_rising_closes() {
        let values: Vec<f64> = (100..130).map(f64::from).collect();
        let results = sma(&values, 14);
        assert_eq!(results[13], Some(106.5));
    }

    #[test]
    fn test_sma_insufficient_data() {
        assert_series_eq(&sma(&[1.0, 2.0], 3), &[None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        // SMA(1) is just the close price
        assert_series_eq(&sma(&[1.0, 2.0, 3.0], 1), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn test_sma_period_zero() {
        assert_series_eq(&sma(&[1.0, 2.0], 0), &[None, None]);
    }

    #[test]
    fn test_sma_skips_windows_with_nan() {
        let results = sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert_series_eq(&results, &[None, None, None, Some(3.5), Some(4.5)]);
    }
}
