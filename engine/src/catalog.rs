// Static parameter schema for every supported indicator.
use serde::Serialize;
use shared::models::{IndicatorId, ParameterSet};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Momentum,
    Trend,
    Volatility,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndicatorSpec {
    pub id: IndicatorId,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub common_mistakes: &'static str,
    pub parameters: &'static [ParameterSpec],
}

const fn param(name: &'static str, label: &'static str, min: f64, max: f64, default: f64, step: f64) -> ParameterSpec {
    ParameterSpec { name, label, min, max, default, step }
}

static CATALOG: [IndicatorSpec; 11] = [
    IndicatorSpec {
        id: IndicatorId::Rsi,
        name: "RSI",
        category: Category::Momentum,
        description: "Relative Strength Index measures the speed and magnitude of recent price changes. It oscillates between 0-100, with readings above 70 considered overbought and below 30 oversold.",
        common_mistakes: "RSI above 70 doesn't mean \"sell now\". Strong trends can stay overbought for weeks. Use it to understand market stretch, not as a trading trigger.",
        parameters: &[param("period", "Period", 5.0, 30.0, 14.0, 1.0)],
    },
    IndicatorSpec {
        id: IndicatorId::Macd,
        name: "MACD",
        category: Category::Momentum,
        description: "Moving Average Convergence Divergence shows the relationship between two moving averages. The histogram reveals momentum shifts.",
        common_mistakes: "MACD crossovers lag behind price action. They're better for confirming trends than predicting reversals.",
        parameters: &[
            param("fastPeriod", "Fast Period", 8.0, 20.0, 12.0, 1.0),
            param("slowPeriod", "Slow Period", 20.0, 35.0, 26.0, 1.0),
            param("signalPeriod", "Signal Period", 5.0, 15.0, 9.0, 1.0),
        ],
    },
    IndicatorSpec {
        id: IndicatorId::Stoch,
        name: "Stochastic",
        category: Category::Momentum,
        description: "Stochastic Oscillator compares closing price to the price range over a period. Shows where price closed relative to recent highs/lows.",
        common_mistakes: "Like RSI, overbought/oversold readings can persist in strong trends. It's about context, not absolutes.",
        parameters: &[
            param("kPeriod", "K Period", 5.0, 21.0, 14.0, 1.0),
            param("dPeriod", "D Period", 1.0, 10.0, 3.0, 1.0),
        ],
    },
    IndicatorSpec {
        id: IndicatorId::StochRsi,
        name: "Stoch RSI",
        category: Category::Momentum,
        description: "Applies the Stochastic formula to RSI values instead of price. More sensitive than regular RSI.",
        common_mistakes: "Higher sensitivity means more false signals. Great for spotting short-term shifts, not trend direction.",
        parameters: &[param("period", "Period", 5.0, 21.0, 14.0, 1.0)],
    },
    IndicatorSpec {
        id: IndicatorId::Obv,
        name: "OBV",
        category: Category::Momentum,
        description: "On-Balance Volume adds volume on up days and subtracts on down days. Shows whether volume flows into or out of an asset.",
        common_mistakes: "OBV divergences from price can take a long time to resolve. It's a leading indicator but requires patience.",
        parameters: &[],
    },
    IndicatorSpec {
        id: IndicatorId::Sma,
        name: "SMA",
        category: Category::Trend,
        description: "Simple Moving Average smooths price data by calculating the average over a specified period. Great for identifying trend direction.",
        common_mistakes: "Moving averages lag behind price. They tell you where price has been, not where it's going.",
        parameters: &[param("period", "Period", 5.0, 200.0, 20.0, 1.0)],
    },
    IndicatorSpec {
        id: IndicatorId::Ema,
        name: "EMA",
        category: Category::Trend,
        description: "Exponential Moving Average gives more weight to recent prices, making it more responsive than SMA.",
        common_mistakes: "Faster response means more whipsaws. EMA is great for trends but can generate false signals in choppy markets.",
        parameters: &[param("period", "Period", 5.0, 200.0, 20.0, 1.0)],
    },
    IndicatorSpec {
        id: IndicatorId::Adx,
        name: "ADX",
        category: Category::Trend,
        description: "Average Directional Index measures trend strength, not direction. Above 25 = trending, below 20 = ranging.",
        common_mistakes: "ADX doesn't tell you if the trend is up or down, just how strong it is. High ADX in a downtrend is still a strong trend.",
        parameters: &[param("period", "Period", 7.0, 28.0, 14.0, 1.0)],
    },
    IndicatorSpec {
        id: IndicatorId::Bbands,
        name: "Bollinger Bands",
        category: Category::Volatility,
        description: "Bands that expand and contract based on volatility. Price touching the bands shows relative high/low.",
        common_mistakes: "Price can \"walk the band\" in strong trends. Touching upper band doesn't mean overbought in an uptrend.",
        parameters: &[
            param("period", "Period", 10.0, 30.0, 20.0, 1.0),
            param("stdDev", "Std Deviation", 1.0, 3.0, 2.0, 0.5),
        ],
    },
    IndicatorSpec {
        id: IndicatorId::Atr,
        name: "ATR",
        category: Category::Volatility,
        description: "Average True Range measures volatility by looking at the range of each candle. Higher ATR = higher volatility.",
        common_mistakes: "ATR doesn't indicate direction. It's useful for position sizing and setting stop-losses, not predicting moves.",
        parameters: &[param("period", "Period", 7.0, 28.0, 14.0, 1.0)],
    },
    IndicatorSpec {
        id: IndicatorId::SupportResistance,
        name: "Support/Resistance",
        category: Category::Volatility,
        description: "Key price levels where buyers (support) or sellers (resistance) have historically been active.",
        common_mistakes: "S/R levels are zones, not exact prices. Price often overshoots before reversing, so don't trade exact touches.",
        parameters: &[],
    },
];

pub fn all() -> &'static [IndicatorSpec] {
    &CATALOG
}

pub fn spec(id: IndicatorId) -> &'static IndicatorSpec {
    let slot = match id {
        IndicatorId::Rsi => 0,
        IndicatorId::Macd => 1,
        IndicatorId::Stoch => 2,
        IndicatorId::StochRsi => 3,
        IndicatorId::Obv => 4,
        IndicatorId::Sma => 5,
        IndicatorId::Ema => 6,
        IndicatorId::Adx => 7,
        IndicatorId::Bbands => 8,
        IndicatorId::Atr => 9,
        IndicatorId::SupportResistance => 10,
    };
    &CATALOG[slot]
}

/// Named indicator groups offered as one-click selections.
pub fn preset(name: &str) -> Option<&'static [IndicatorId]> {
    const MOMENTUM: &[IndicatorId] = &[IndicatorId::Rsi, IndicatorId::Macd, IndicatorId::Obv];
    const TREND: &[IndicatorId] = &[IndicatorId::Sma, IndicatorId::Ema, IndicatorId::Adx];
    const VOLATILITY: &[IndicatorId] = &[IndicatorId::Bbands, IndicatorId::Atr];

    match name.to_ascii_lowercase().as_str() {
        "momentum" => Some(MOMENTUM),
        "trend" => Some(TREND),
        "volatility" => Some(VOLATILITY),
        _ => None,
    }
}

/// A guided indicator combination for studying one market situation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub details: &'static str,
    pub indicators: &'static [IndicatorId],
}

static SCENARIOS: [Scenario; 3] = [
    Scenario {
        id: "trend-reversal",
        title: "Trend Reversal Anatomy",
        subtitle: "Watch price vs EMA with RSI balance",
        details: "A simple structure for spotting when momentum stops making new highs/lows and begins to flip. EMA provides trend baseline; RSI shows whether momentum is reclaiming strength.",
        indicators: &[IndicatorId::Ema, IndicatorId::Rsi],
    },
    Scenario {
        id: "range-compression",
        title: "Range Compression",
        subtitle: "Volatility squeeze with Bollinger Bands + ATR",
        details: "Use band width and ATR % to see when the market is coiling. Breakouts after compression can run, but direction still comes from price action.",
        indicators: &[IndicatorId::Bbands, IndicatorId::Atr],
    },
    Scenario {
        id: "momentum-checkup",
        title: "Momentum Checkup",
        subtitle: "Short-term vs long-term balance",
        details: "Contrast short-term momentum with moving average baselines to see if pullbacks are healthy or breaking down.",
        indicators: &[IndicatorId::Rsi, IndicatorId::Sma, IndicatorId::Ema],
    },
];

pub fn scenarios() -> &'static [Scenario] {
    &SCENARIOS
}

pub fn scenario(id: &str) -> Option<&'static Scenario> {
    let wanted = id.trim().to_ascii_lowercase();
    SCENARIOS.iter().find(|s| s.id == wanted)
}

/// Parameters of one indicator with schema defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    values: BTreeMap<&'static str, f64>,
}

impl ResolvedParameters {
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(f64::NAN)
    }

    /// Parameter as a window length. Anything that is not a finite value >= 1 maps to 0.
    pub fn period(&self, name: &str) -> usize {
        to_period(self.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

pub fn to_period(value: f64) -> usize {
    if value.is_finite() && value >= 1.0 {
        value.floor() as usize
    } else {
        0
    }
}

/// Caller values win when finite; the schema default covers everything else. Ranges are not enforced.
pub fn resolve_parameters(id: IndicatorId, provided: &ParameterSet) -> ResolvedParameters {
    let overrides = provided.get(id.as_str());
    let values = spec(id)
        .parameters
        .iter()
        .map(|p| {
            let value = overrides
                .and_then(|m| m.get(p.name))
                .copied()
                .filter(|v| v.is_finite())
                .unwrap_or(p.default);
            (p.name, value)
        })
        .collect();
    ResolvedParameters { values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_indicator_once() {
        for id in IndicatorId::ALL {
            assert_eq!(CATALOG.iter().filter(|s| s.id == id).count(), 1, "{id}");
            assert_eq!(spec(id).id, id);
        }
    }

    #[test]
    fn test_defaults_sit_inside_documented_ranges() {
        for s in all() {
            for p in s.parameters {
                assert!(p.min <= p.default && p.default <= p.max, "{}.{}", s.id, p.name);
                assert!(p.step > 0.0);
            }
        }
    }

    #[test]
    fn test_resolve_falls_back_to_defaults() {
        let mut provided = ParameterSet::new();
        provided.insert("macd".into(), BTreeMap::from([("fastPeriod".to_string(), 10.0)]));
        let params = resolve_parameters(IndicatorId::Macd, &provided);
        assert_eq!(params.period("fastPeriod"), 10);
        assert_eq!(params.period("slowPeriod"), 26);
        assert_eq!(params.period("signalPeriod"), 9);
    }

    #[test]
    fn test_resolve_ignores_non_finite_and_unknown_keys() {
        let mut provided = ParameterSet::new();
        provided.insert(
            "bbands".into(),
            BTreeMap::from([("stdDev".to_string(), f64::NAN), ("bogus".to_string(), 3.0)]),
        );
        let params = resolve_parameters(IndicatorId::Bbands, &provided);
        assert_eq!(params.get("stdDev"), 2.0);
        assert_eq!(params.iter().count(), 2);
    }

    #[test]
    fn test_out_of_range_values_are_kept() {
        let mut provided = ParameterSet::new();
        provided.insert("rsi".into(), BTreeMap::from([("period".to_string(), 500.0)]));
        assert_eq!(resolve_parameters(IndicatorId::Rsi, &provided).period("period"), 500);
    }

    #[test]
    fn test_to_period() {
        assert_eq!(to_period(14.0), 14);
        assert_eq!(to_period(14.9), 14);
        assert_eq!(to_period(0.5), 0);
        assert_eq!(to_period(-3.0), 0);
        assert_eq!(to_period(f64::INFINITY), 0);
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(scenarios().len(), 3);
        assert_eq!(
            scenario("trend-reversal").map(|s| s.indicators),
            Some(&[IndicatorId::Ema, IndicatorId::Rsi][..])
        );
        assert_eq!(
            scenario(" Range-Compression ").map(|s| s.indicators),
            Some(&[IndicatorId::Bbands, IndicatorId::Atr][..])
        );
        assert_eq!(scenario("momentum-checkup").map(|s| s.indicators.len()), Some(3));
        assert!(scenario("breakout").is_none());
    }

    #[test]
    fn test_presets() {
        assert_eq!(preset("trend"), Some(&[IndicatorId::Sma, IndicatorId::Ema, IndicatorId::Adx][..]));
        assert_eq!(preset("Volatility").map(|p| p.len()), Some(2));
        assert!(preset("scalping").is_none());
    }
}
