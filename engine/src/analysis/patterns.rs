// Divergence and squeeze hints over the trailing lookback window.
use super::{sub_series, value_at, SQUEEZE_THRESHOLD_PCT};
use crate::indicators::bbands::band_width_pct;
use shared::models::{series_keys, Candle, ComputedSeriesMap, IndicatorId, PatternHint, Severity};

pub const DEFAULT_LOOKBACK: usize = 80;
pub const HINT_LIMIT: usize = 3;
pub const MIN_CANDLES: usize = 20;
/// RSI must disagree with price by more than this many points to count as divergence.
pub const DIVERGENCE_MARGIN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingPoints {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternScanner {
    lookback: usize,
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK)
    }
}

impl PatternScanner {
    pub fn new(lookback: usize) -> Self {
        Self { lookback }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Closes that are strictly above (swing high) or below (swing low) both neighbours.
    ///
    /// Scans the last `lookback` candles, starting no earlier than index 2 and stopping before
    /// the final two candles, whose right-hand side is not settled yet.
    pub fn swing_points(&self, candles: &[Candle]) -> SwingPoints {
        let mut points = SwingPoints::default();
        let start = candles.len().saturating_sub(self.lookback).max(2);
        let end = candles.len().saturating_sub(2);

        for i in start..end {
            let prev = candles[i - 1].close;
            let curr = candles[i].close;
            let next = candles[i + 1].close;
            if curr > prev && curr > next {
                points.highs.push(SwingPoint { index: i, price: curr });
            }
            if curr < prev && curr < next {
                points.lows.push(SwingPoint { index: i, price: curr });
            }
        }
        points
    }

    pub fn scan(&self, candles: &[Candle], series: &ComputedSeriesMap, selected: &[IndicatorId]) -> Vec<PatternHint> {
        let mut hints = Vec::new();
        if candles.len() < MIN_CANDLES {
            return hints;
        }

        if selected.contains(&IndicatorId::Rsi) {
            if let Some(rsi) = sub_series(series, IndicatorId::Rsi, series_keys::VALUE) {
                let swings = self.swing_points(candles);

                if let [.., first, second] = swings.lows.as_slice() {
                    if let (Some(rsi1), Some(rsi2)) = (value_at(rsi, first.index), value_at(rsi, second.index)) {
                        if second.price < first.price && rsi2 > rsi1 + DIVERGENCE_MARGIN {
                            hints.push(PatternHint {
                                title: "Bullish divergence".to_string(),
                                description: "Price made a lower low while RSI made a higher low. Momentum loss, not a guarantee of reversal.".to_string(),
                                severity: Severity::Watch,
                            });
                        }
                    }
                }

                if let [.., first, second] = swings.highs.as_slice() {
                    if let (Some(rsi1), Some(rsi2)) = (value_at(rsi, first.index), value_at(rsi, second.index)) {
                        if second.price > first.price && rsi2 < rsi1 - DIVERGENCE_MARGIN {
                            hints.push(PatternHint {
                                title: "Bearish divergence".to_string(),
                                description: "Price made a higher high while RSI made a lower high. Uptrend momentum is fading.".to_string(),
                                severity: Severity::Watch,
                            });
                        }
                    }
                }
            }
        }

        if selected.contains(&IndicatorId::Bbands) {
            if let (Some(upper), Some(middle), Some(lower)) = (
                sub_series(series, IndicatorId::Bbands, series_keys::UPPER),
                sub_series(series, IndicatorId::Bbands, series_keys::MIDDLE),
                sub_series(series, IndicatorId::Bbands, series_keys::LOWER),
            ) {
                let last = candles.len() - 1;
                let width = band_width_pct(value_at(upper, last), value_at(middle, last), value_at(lower, last));
                if let Some(width) = width.filter(|w| *w < SQUEEZE_THRESHOLD_PCT) {
                    hints.push(PatternHint {
                        title: "Volatility squeeze".to_string(),
                        description: format!(
                            "Bands are tight ({:.1}% of price). Expansions often follow squeezes; direction still comes from price.",
                            width
                        ),
                        severity: Severity::Info,
                    });
                }
            }
        }

        let excess = hints.len().saturating_sub(HINT_LIMIT);
        hints.drain(..excess);
        hints
    }
}
