// Plain-language reading of the latest value of each selected indicator.
use super::{sub_series, value_at};
use crate::catalog;
use crate::indicators::bbands::band_width_pct;
use crate::indicators::finite;
use shared::models::{series_keys, Candle, ComputedSeriesMap, IndicatorId, Insight, ParameterSet, Sentiment};

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const ADX_TRENDING: f64 = 25.0;
const WIDE_BANDS_PCT: f64 = 10.0;

fn insight(indicator: &str, title: String, description: String, sentiment: Sentiment, warning: &str) -> Insight {
    Insight {
        indicator: indicator.to_string(),
        title,
        description,
        sentiment,
        warning: Some(warning.to_string()),
    }
}

/// One insight per selected indicator whose latest value is defined, in selection order.
///
/// Indicators without a narrative (OBV, Stochastic, Stoch RSI, Support/Resistance) are skipped.
pub fn build_insights(
    candles: &[Candle],
    series: &ComputedSeriesMap,
    selected: &[IndicatorId],
    parameters: &ParameterSet,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let Some(last_candle) = candles.last() else {
        return insights;
    };
    let last = candles.len() - 1;
    // Readings that compare against price are skipped when the last close is unusable.
    let close = finite(Some(last_candle.close));
    let latest = |id: IndicatorId, key: &str| sub_series(series, id, key).and_then(|s| value_at(s, last));

    for &id in selected {
        let insight = match id {
            IndicatorId::Rsi => latest(id, series_keys::VALUE).map(rsi_insight),
            IndicatorId::Macd => match (latest(id, series_keys::MACD), latest(id, series_keys::SIGNAL)) {
                (Some(macd), Some(signal)) => Some(macd_insight(macd > signal)),
                _ => None,
            },
            IndicatorId::Sma | IndicatorId::Ema => latest(id, series_keys::VALUE).zip(close).map(|(average, close)| {
                let period = catalog::resolve_parameters(id, parameters).period("period");
                moving_average_insight(id, period, close > average)
            }),
            IndicatorId::Bbands => {
                let middle = latest(id, series_keys::MIDDLE);
                band_width_pct(latest(id, series_keys::UPPER), middle, latest(id, series_keys::LOWER))
                    .zip(middle.zip(close))
                    .map(|(width, (middle, close))| bands_insight(width, close > middle))
            }
            IndicatorId::Adx => latest(id, series_keys::VALUE).map(adx_insight),
            IndicatorId::Atr => latest(id, series_keys::VALUE)
                .zip(close.filter(|c| *c != 0.0))
                .and_then(|(atr, close)| finite(Some(atr / close * 100.0)))
                .map(atr_insight),
            IndicatorId::Stoch | IndicatorId::StochRsi | IndicatorId::Obv | IndicatorId::SupportResistance => None,
        };
        if let Some(insight) = insight {
            insights.push(insight);
        }
    }
    insights
}

fn rsi_insight(rsi: f64) -> Insight {
    if rsi > RSI_OVERBOUGHT {
        insight(
            "RSI",
            format!("RSI at {:.1}: market stretched high", rsi),
            "Buyers have been aggressive lately. Think of it like a rubber band pulled tight.".to_string(),
            Sentiment::Neutral,
            "This is NOT a 'sell signal'. Strong uptrends can stay overbought for weeks. It just means the market is extended.",
        )
    } else if rsi < RSI_OVERSOLD {
        insight(
            "RSI",
            format!("RSI at {:.1}: market stretched low", rsi),
            "Sellers have been in control. The rubber band is pulled down.".to_string(),
            Sentiment::Neutral,
            "This is NOT a 'buy signal'. Downtrends can stay oversold for a long time. Context matters!",
        )
    } else {
        Insight {
            indicator: "RSI".to_string(),
            title: format!("RSI at {:.1}: balanced zone", rsi),
            description: "Neither stretched high nor low. The market is in a neutral state.".to_string(),
            sentiment: Sentiment::Neutral,
            warning: None,
        }
    }
}

fn macd_insight(above_signal: bool) -> Insight {
    let (side, description, sentiment) = if above_signal {
        (
            "above",
            "Short-term momentum is positive relative to longer-term. The fast average is above the slow.",
            Sentiment::Bullish,
        )
    } else {
        (
            "below",
            "Short-term momentum is negative. The fast average is below the slow.",
            Sentiment::Bearish,
        )
    };
    insight(
        "MACD",
        format!("MACD {} signal line", side),
        description.to_string(),
        sentiment,
        "MACD crossovers LAG behind price. They confirm what happened, not what will happen.",
    )
}

fn moving_average_insight(id: IndicatorId, period: usize, above: bool) -> Insight {
    let label = catalog::spec(id).name;
    let (side, description, sentiment) = if above {
        (
            "above",
            format!("Current price is above the {}-period average. Often seen as short-term strength.", period),
            Sentiment::Bullish,
        )
    } else {
        (
            "below",
            format!("Current price is below the {}-period average. Price has been weaker than recent average.", period),
            Sentiment::Bearish,
        )
    };
    insight(
        label,
        format!("Price {} {}-period {}", side, period, label),
        description,
        sentiment,
        "Moving averages lag behind price. They show where price HAS been, not where it's going.",
    )
}

fn bands_insight(width: f64, upper_half: bool) -> Insight {
    let description = if width > WIDE_BANDS_PCT {
        format!("Bands are wide ({:.1}% spread), so volatility is elevated.", width)
    } else {
        format!(
            "Bands are narrow ({:.1}% spread), so volatility is compressed. Big moves often follow squeezes.",
            width
        )
    };
    insight(
        "Bollinger Bands",
        format!("Price in {} of bands", if upper_half { "upper half" } else { "lower half" }),
        description,
        Sentiment::Neutral,
        "Price can \"walk the band\" in strong trends. Touching the upper band in an uptrend is normal, not a sell signal.",
    )
}

fn adx_insight(adx: f64) -> Insight {
    let trending = adx > ADX_TRENDING;
    let description = if trending {
        "A strong trend is in place. This could be UP or DOWN; ADX only measures strength, not direction."
    } else {
        "The market is choppy or sideways. Trend-following strategies may struggle here."
    };
    insight(
        "ADX",
        format!("ADX at {:.1}: {} market", adx, if trending { "trending" } else { "ranging" }),
        description.to_string(),
        Sentiment::Neutral,
        "High ADX in a downtrend still means strong trend. ADX rising while price falls = strong downtrend!",
    )
}

fn atr_insight(atr_pct: f64) -> Insight {
    insight(
        "ATR",
        format!("ATR is {:.2}% of price", atr_pct),
        "Average range per candle. Useful for sizing positions and setting stop-losses, not for direction.".to_string(),
        Sentiment::Neutral,
        "ATR shows volatility, NOT direction. A high ATR just means big moves are happening.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candles_from_closes;
    use shared::models::IndicatorSeries;
    use std::collections::BTreeMap;

    fn map(entries: Vec<(IndicatorId, Vec<(&str, f64)>)>, len: usize) -> ComputedSeriesMap {
        entries
            .into_iter()
            .map(|(id, keys)| {
                let series: IndicatorSeries = keys
                    .into_iter()
                    .map(|(k, v)| {
                        let mut values = vec![None; len];
                        values[len - 1] = Some(v);
                        (k.to_string(), values)
                    })
                    .collect();
                (id, series)
            })
            .collect()
    }

    #[test]
    fn test_rsi_zones() {
        let candles = candles_from_closes(&[100.0; 5]);
        let titles: Vec<String> = [75.0, 25.0, 50.0]
            .into_iter()
            .map(|rsi| {
                let series = map(vec![(IndicatorId::Rsi, vec![("value", rsi)])], 5);
                build_insights(&candles, &series, &[IndicatorId::Rsi], &ParameterSet::new())
                    .remove(0)
                    .title
            })
            .collect();
        assert_eq!(
            titles,
            vec![
                "RSI at 75.0: market stretched high",
                "RSI at 25.0: market stretched low",
                "RSI at 50.0: balanced zone",
            ]
        );
    }

    #[test]
    fn test_balanced_rsi_has_no_warning() {
        let candles = candles_from_closes(&[100.0; 5]);
        let series = map(vec![(IndicatorId::Rsi, vec![("value", 55.0)])], 5);
        let insights = build_insights(&candles, &series, &[IndicatorId::Rsi], &ParameterSet::new());
        assert!(insights[0].warning.is_none());
    }

    #[test]
    fn test_macd_sentiment() {
        let candles = candles_from_closes(&[100.0; 5]);
        let series = map(vec![(IndicatorId::Macd, vec![("macd", -0.5), ("signal", 0.2), ("histogram", -0.7)])], 5);
        let insights = build_insights(&candles, &series, &[IndicatorId::Macd], &ParameterSet::new());
        assert_eq!(insights[0].title, "MACD below signal line");
        assert_eq!(insights[0].sentiment, Sentiment::Bearish);
    }

    #[test]
    fn test_moving_average_uses_resolved_period() {
        let candles = candles_from_closes(&[100.0, 101.0, 110.0]);
        let series = map(
            vec![(IndicatorId::Sma, vec![("value", 105.0)]), (IndicatorId::Ema, vec![("value", 112.0)])],
            3,
        );
        let mut params = ParameterSet::new();
        params.insert("sma".into(), BTreeMap::from([("period".to_string(), 50.0)]));
        let insights = build_insights(&candles, &series, &[IndicatorId::Sma, IndicatorId::Ema], &params);
        assert_eq!(insights[0].title, "Price above 50-period SMA");
        assert_eq!(insights[0].sentiment, Sentiment::Bullish);
        assert_eq!(insights[1].title, "Price below 20-period EMA");
        assert_eq!(insights[1].sentiment, Sentiment::Bearish);
    }

    #[test]
    fn test_bands_width_and_position() {
        let candles = candles_from_closes(&[100.0, 99.0]);
        let series = map(vec![(IndicatorId::Bbands, vec![("upper", 108.0), ("middle", 100.0), ("lower", 92.0)])], 2);
        let insights = build_insights(&candles, &series, &[IndicatorId::Bbands], &ParameterSet::new());
        assert_eq!(insights[0].title, "Price in lower half of bands");
        assert!(insights[0].description.starts_with("Bands are wide (16.0% spread)"));
    }

    #[test]
    fn test_adx_and_atr() {
        let candles = candles_from_closes(&[200.0; 3]);
        let series = map(vec![(IndicatorId::Adx, vec![("value", 30.0)]), (IndicatorId::Atr, vec![("value", 3.0)])], 3);
        let insights = build_insights(&candles, &series, &[IndicatorId::Adx, IndicatorId::Atr], &ParameterSet::new());
        assert_eq!(insights[0].title, "ADX at 30.0: trending market");
        assert_eq!(insights[1].title, "ATR is 1.50% of price");
    }

    #[test]
    fn test_non_finite_close_skips_price_relative_insights() {
        let mut candles = candles_from_closes(&[100.0; 4]);
        candles[3].close = f64::NAN;
        let series = map(
            vec![
                (IndicatorId::Atr, vec![("value", 4.25)]),
                (IndicatorId::Ema, vec![("value", 100.0)]),
                (IndicatorId::Bbands, vec![("upper", 104.0), ("middle", 100.0), ("lower", 96.0)]),
                (IndicatorId::Rsi, vec![("value", 50.0)]),
            ],
            4,
        );
        let selected = [IndicatorId::Atr, IndicatorId::Ema, IndicatorId::Bbands, IndicatorId::Rsi];
        let insights = build_insights(&candles, &series, &selected, &ParameterSet::new());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].indicator, "RSI");
        assert!(insights.iter().all(|i| !i.title.contains("NaN") && !i.description.contains("NaN")));

        candles[3].close = f64::INFINITY;
        let insights = build_insights(&candles, &series, &[IndicatorId::Atr], &ParameterSet::new());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_undefined_latest_value_is_skipped() {
        let candles = candles_from_closes(&[100.0; 4]);
        let mut series = map(vec![(IndicatorId::Rsi, vec![("value", 50.0)])], 4);
        series.get_mut(&IndicatorId::Rsi).unwrap().get_mut("value").unwrap()[3] = None;
        let selected = [IndicatorId::Rsi, IndicatorId::Obv];
        assert!(build_insights(&candles, &series, &selected, &ParameterSet::new()).is_empty());
        assert!(build_insights(&[], &series, &[IndicatorId::Rsi], &ParameterSet::new()).is_empty());
    }
}
