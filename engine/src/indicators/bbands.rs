// Bollinger Bands indicator implementation
use super::{closes, finite, to_options, window_mean, IndicatorCalculator};
use serde_json::Value;
use shared::models::{series_keys, Candle, IndicatorId, IndicatorSeries, Series};

pub struct BollingerBands {
    name: String,
    period: usize,
    std_dev: f64,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64) -> Self {
        Self {
            name: format!("BBANDS({}, {})", period, std_dev),
            period,
            std_dev,
        }
    }
}

impl IndicatorCalculator for BollingerBands {
    fn id(&self) -> IndicatorId {
        IndicatorId::Bbands
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "stdDev": self.std_dev })
    }

    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        let bands = bollinger_bands(&closes(data), self.period, self.std_dev);
        IndicatorSeries::from([
            (series_keys::UPPER.to_string(), bands.upper),
            (series_keys::MIDDLE.to_string(), bands.middle),
            (series_keys::LOWER.to_string(), bands.lower),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Middle band is the SMA; upper/lower sit `multiplier` population standard deviations away.
pub fn bollinger_bands(values: &[f64], period: usize, multiplier: f64) -> Bands {
    let n = values.len();
    let mut bands = Bands {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if period == 0 || n < period {
        return bands;
    }

    let values = to_options(values);
    for (offset, window) in values.windows(period).enumerate() {
        let i = offset + period - 1;
        let Some(mean) = window_mean(window) else {
            continue;
        };
        let variance = window
            .iter()
            .flatten()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / period as f64;
        let Some(sigma) = finite(Some(variance.sqrt())) else {
            continue;
        };
        let (Some(upper), Some(lower)) = (
            finite(Some(mean + multiplier * sigma)),
            finite(Some(mean - multiplier * sigma)),
        ) else {
            continue;
        };
        bands.upper[i] = Some(upper);
        bands.middle[i] = Some(mean);
        bands.lower[i] = Some(lower);
    }
    bands
}

/// Band width as a percentage of the middle band; `None` when undefined or the middle is zero.
pub fn band_width_pct(upper: Option<f64>, middle: Option<f64>, lower: Option<f64>) -> Option<f64> {
    let (upper, middle, lower) = (finite(upper)?, finite(middle)?, finite(lower)?);
    if middle == 0.0 {
        return None;
    }
    finite(Some((upper - lower) / middle * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::sma::sma;
    use crate::indicators::test_support::*;

    #[test]
    fn test_constant_closes_collapse_bands() {
        let bands = bollinger_bands(&[50.0; 25], 10, 2.0);
        for i in 0..9 {
            assert_eq!(bands.middle[i], None);
            assert_eq!(bands.upper[i], None);
        }
        for i in 9..25 {
            assert_eq!(bands.upper[i], Some(50.0));
            assert_eq!(bands.middle[i], Some(50.0));
            assert_eq!(bands.lower[i], Some(50.0));
        }
    }

    #[test]
    fn test_population_standard_deviation() {
        // mean 5, population variance 4 -> sigma 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger_bands(&values, 8, 2.0);
        assert_eq!(bands.middle[7], Some(5.0));
        assert_eq!(bands.upper[7], Some(9.0));
        assert_eq!(bands.lower[7], Some(1.0));
    }

    #[test]
    fn test_middle_band_is_sma() {
        let values: Vec<f64> = (0..30).map(|i| 20.0 + (i as f64).sin()).collect();
        let bands = bollinger_bands(&values, 20, 2.0);
        assert_series_eq(&bands.middle, &sma(&values, 20));
    }

    #[test]
    fn test_calculator_output_shape() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let series = BollingerBands::new(20, 2.0).calculate(&candles);
        assert_eq!(series.len(), 3);
        assert!(series.values().all(|s| s.len() == 3 && s.iter().all(Option::is_none)));
    }

    #[test]
    fn test_band_width_pct() {
        let width = band_width_pct(Some(103.0), Some(100.0), Some(97.0)).unwrap();
        assert!((width - 6.0).abs() < 1e-9);
        assert_eq!(band_width_pct(Some(1.0), Some(0.0), Some(-1.0)), None);
        assert_eq!(band_width_pct(None, Some(100.0), Some(97.0)), None);
    }
}
