// Moving Average Convergence Divergence (MACD) indicator implementation
use super::ema::{ema, ema_of_series};
use super::{closes, finite, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct Macd {
    name: String,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            name: format!("MACD({}, {}, {})", fast_period, slow_period, signal_period),
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn id(&self) -> IndicatorId {
        IndicatorId::Macd
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "fastPeriod": self.fast_period,
            "slowPeriod": self.slow_period,
            "signalPeriod": self.signal_period,
        })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        let lines = macd(&closes(data), self.fast_period, self.slow_period, self.signal_period);
        IndicatorSeries::from([
            (series_keys::MACD.to_string(), lines.macd),
            (series_keys::SIGNAL.to_string(), lines.signal),
            (series_keys::HISTOGRAM.to_string(), lines.histogram),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// MACD line = EMA(fast) - EMA(slow). The signal EMA is seeded from the first `signal`
/// defined MACD values only, so the warm-up region never feeds it placeholder zeros.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let macd_line: Series = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| finite(Some((*f)? - (*s)?)))
        .collect();
    let signal_line = ema_of_series(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| finite(Some((*m)? - (*s)?)))
        .collect();

    MacdLines {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::*;

    #[test]
    fn test_macd_warm_up_lengths() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let lines = macd(&values, 12, 26, 9);
        assert_eq!(lines.macd.len(), 60);
        assert_eq!(lines.macd.iter().position(Option::is_some), Some(25));
        assert_eq!(lines.signal.iter().position(Option::is_some), Some(25 + 8));
        assert_eq!(lines.histogram.iter().position(Option::is_some), Some(33));
        assert_all_finite(&lines.histogram);
    }

    #[test]
    fn test_macd_line_is_ema_difference() {
        let values: Vec<f64> = (0..40).map(|i| 10.0 + i as f64 * 0.5 + (i % 4) as f64).collect();
        let lines = macd(&values, 3, 6, 4);
        let fast = ema(&values, 3);
        let slow = ema(&values, 6);
        for i in 5..40 {
            let expected = fast[i].unwrap() - slow[i].unwrap();
            assert!((lines.macd[i].unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_histogram_is_macd_minus_signal() {
        let values: Vec<f64> = (0..50).map(|i| 30.0 + (i as f64 * 0.4).cos() * 3.0).collect();
        let lines = macd(&values, 5, 10, 3);
        for i in 0..50 {
            match (lines.macd[i], lines.signal[i], lines.histogram[i]) {
                (Some(m), Some(s), Some(h)) => assert!((m - s - h).abs() < 1e-12),
                (_, _, None) => assert!(lines.macd[i].is_none() || lines.signal[i].is_none()),
                _ => panic!("histogram defined without both lines at {}", i),
            }
        }
    }

    #[test]
    fn test_macd_constant_prices_are_zero() {
        let candles = candles_from_closes(&[7.0; 45]);
        let series = Macd::new(12, 26, 9).calculate(&candles);
        assert!(series["histogram"].iter().flatten().all(|v| *v == 0.0));
        assert_eq!(series["signal"].iter().flatten().count(), 45 - 33);
    }

    #[test]
    fn test_macd_empty_input() {
        let lines = macd(&[], 12, 26, 9);
        assert!(lines.macd.is_empty() && lines.signal.is_empty() && lines.histogram.is_empty());
    }
}
