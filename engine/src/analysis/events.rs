// Crossover and squeeze events, scanned left to right over adjacent candle pairs.
use super::{sub_series, value_at, SQUEEZE_THRESHOLD_PCT};
use crate::indicators::bbands::band_width_pct;
use shared::models::{series_keys, Candle, ComputedSeriesMap, Event, IndicatorId};

/// Display budget: only the most recent events are kept.
pub const EVENT_LIMIT: usize = 12;
pub const MIN_CANDLES: usize = 3;

pub const BULLISH_COLOR: &str = "#22C55E";
pub const BEARISH_COLOR: &str = "#EF4444";
pub const VOLATILITY_COLOR: &str = "#A855F7";

pub fn build_events(candles: &[Candle], series: &ComputedSeriesMap, selected: &[IndicatorId]) -> Vec<Event> {
    let mut events = Vec::new();
    if candles.len() < MIN_CANDLES {
        return events;
    }

    if selected.contains(&IndicatorId::Ema) {
        if let Some(ema) = sub_series(series, IndicatorId::Ema, series_keys::VALUE) {
            for i in 1..candles.len() {
                let (Some(prev), Some(curr)) = (value_at(ema, i - 1), value_at(ema, i)) else {
                    continue;
                };
                let prev_diff = candles[i - 1].close - prev;
                let curr_diff = candles[i].close - curr;
                if prev_diff <= 0.0 && curr_diff > 0.0 {
                    events.push(event(candles, i, "Price > EMA", "Close pushed back above EMA", BULLISH_COLOR));
                } else if prev_diff >= 0.0 && curr_diff < 0.0 {
                    events.push(event(candles, i, "Price < EMA", "Close slipped below EMA", BEARISH_COLOR));
                }
            }
        }
    }

    if selected.contains(&IndicatorId::Rsi) {
        if let Some(rsi) = sub_series(series, IndicatorId::Rsi, series_keys::VALUE) {
            for i in 1..candles.len() {
                let (Some(prev), Some(curr)) = (value_at(rsi, i - 1), value_at(rsi, i)) else {
                    continue;
                };
                if prev <= 50.0 && curr > 50.0 {
                    events.push(event(candles, i, "RSI > 50", "Momentum flipped constructive", BULLISH_COLOR));
                } else if prev >= 50.0 && curr < 50.0 {
                    events.push(event(candles, i, "RSI < 50", "Momentum flipped defensive", BEARISH_COLOR));
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
            let width = |i: usize| band_width_pct(value_at(upper, i), value_at(middle, i), value_at(lower, i));
            for i in 1..candles.len() {
                let (Some(prev_width), Some(curr_width)) = (width(i - 1), width(i)) else {
                    continue;
                };
                if prev_width >= SQUEEZE_THRESHOLD_PCT && curr_width < SQUEEZE_THRESHOLD_PCT {
                    events.push(event(
                        candles,
                        i,
                        "BB squeeze",
                        "Volatility compressed; watch for expansion",
                        VOLATILITY_COLOR,
                    ));
                }
            }
        }
    }

    // Rules are scanned one after another; order by candle so truncation drops the oldest.
    events.sort_by_key(|e| e.index);
    let excess = events.len().saturating_sub(EVENT_LIMIT);
    events.drain(..excess);
    events
}

fn event(candles: &[Candle], index: usize, label: &str, detail: &str, color: &str) -> Event {
    Event {
        index,
        timestamp: candles[index].timestamp,
        label: label.to_string(),
        detail: detail.to_string(),
        color_tag: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candles_from_closes;
    use shared::models::{IndicatorSeries, Series};

    fn with_series(id: IndicatorId, entries: Vec<(&str, Series)>) -> ComputedSeriesMap {
        let series: IndicatorSeries = entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        ComputedSeriesMap::from([(id, series)])
    }

    #[test]
    fn test_price_crosses_above_flat_ema() {
        let candles = candles_from_closes(&[98.0, 99.0, 101.0, 102.0]);
        let series = with_series(IndicatorId::Ema, vec![("value", vec![Some(100.0); 4])]);
        let events = build_events(&candles, &series, &[IndicatorId::Ema]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 2);
        assert_eq!(events[0].label, "Price > EMA");
        assert_eq!(events[0].timestamp, candles[2].timestamp);
        assert_eq!(events[0].color_tag, BULLISH_COLOR);
    }

    #[test]
    fn test_price_crosses_below_ema() {
        let candles = candles_from_closes(&[101.0, 100.0, 99.0]);
        let series = with_series(IndicatorId::Ema, vec![("value", vec![Some(100.0); 3])]);
        let events = build_events(&candles, &series, &[IndicatorId::Ema]);
        // 101 -> 100 touches (diff 0), 100 -> 99 crosses from >= 0 to < 0
        assert_eq!(events.iter().map(|e| (e.index, e.label.as_str())).collect::<Vec<_>>(), vec![(2, "Price < EMA")]);
    }

    #[test]
    fn test_ema_events_need_selection_and_defined_values() {
        let candles = candles_from_closes(&[99.0, 101.0, 99.0, 101.0]);
        let series = with_series(IndicatorId::Ema, vec![("value", vec![None, Some(100.0), Some(100.0), None])]);
        assert!(build_events(&candles, &series, &[]).is_empty());
        let events = build_events(&candles, &series, &[IndicatorId::Ema]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 2);
    }

    #[test]
    fn test_rsi_midline_crossings() {
        let candles = candles_from_closes(&[1.0; 5]);
        let rsi = vec![None, Some(45.0), Some(55.0), Some(50.0), Some(40.0)];
        let series = with_series(IndicatorId::Rsi, vec![("value", rsi)]);
        let labels: Vec<_> = build_events(&candles, &series, &[IndicatorId::Rsi])
            .into_iter()
            .map(|e| (e.index, e.label))
            .collect();
        assert_eq!(labels, vec![(2, "RSI > 50".to_string()), (4, "RSI < 50".to_string())]);
    }

    #[test]
    fn test_squeeze_onset() {
        let candles = candles_from_closes(&[100.0; 4]);
        let series = with_series(
            IndicatorId::Bbands,
            vec![
                ("upper", vec![None, Some(104.0), Some(102.0), Some(101.0)]),
                ("middle", vec![None, Some(100.0), Some(100.0), Some(100.0)]),
                ("lower", vec![None, Some(96.0), Some(98.0), Some(99.0)]),
            ],
        );
        let events = build_events(&candles, &series, &[IndicatorId::Bbands]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 2);
        assert_eq!(events[0].label, "BB squeeze");
    }

    #[test]
    fn test_too_few_candles() {
        let candles = candles_from_closes(&[99.0, 101.0]);
        let series = with_series(IndicatorId::Ema, vec![("value", vec![Some(100.0); 2])]);
        assert!(build_events(&candles, &series, &[IndicatorId::Ema]).is_empty());
    }

    #[test]
    fn test_only_most_recent_events_are_kept() {
        let closes: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 99.0 } else { 101.0 }).collect();
        let candles = candles_from_closes(&closes);
        let series = with_series(IndicatorId::Ema, vec![("value", vec![Some(100.0); 40])]);
        let events = build_events(&candles, &series, &[IndicatorId::Ema]);
        assert_eq!(events.len(), EVENT_LIMIT);
        assert_eq!(events.first().map(|e| e.index), Some(40 - EVENT_LIMIT));
        assert_eq!(events.last().map(|e| e.index), Some(39));
    }

    #[test]
    fn test_events_are_ordered_across_rules() {
        let candles = candles_from_closes(&[99.0, 99.0, 101.0, 101.0]);
        let mut series = with_series(IndicatorId::Ema, vec![("value", vec![Some(100.0); 4])]);
        series.extend(with_series(
            IndicatorId::Rsi,
            vec![("value", vec![Some(40.0), Some(60.0), Some(60.0), Some(60.0)])],
        ));
        let events = build_events(&candles, &series, &[IndicatorId::Ema, IndicatorId::Rsi]);
        assert_eq!(events.iter().map(|e| e.index).collect::<Vec<_>>(), vec![1, 2]);
    }
}
