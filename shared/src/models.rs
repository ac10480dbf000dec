use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One OHLCV sample. `timestamp` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Index-aligned indicator output. `None` marks positions without enough history.
pub type Series = Vec<Option<f64>>;

/// Named sub-series of one indicator, e.g. `upper`/`middle`/`lower`.
pub type IndicatorSeries = BTreeMap<String, Series>;

pub type ComputedSeriesMap = BTreeMap<IndicatorId, IndicatorSeries>;

/// Indicator id -> parameter name -> value, as supplied by the caller.
pub type ParameterSet = BTreeMap<String, BTreeMap<String, f64>>;

/// Sub-series names used across the engine.
pub mod series_keys {
    pub const VALUE: &str = "value";
    pub const UPPER: &str = "upper";
    pub const MIDDLE: &str = "middle";
    pub const LOWER: &str = "lower";
    pub const MACD: &str = "macd";
    pub const SIGNAL: &str = "signal";
    pub const HISTOGRAM: &str = "histogram";
    pub const K: &str = "k";
    pub const D: &str = "d";
    pub const SUPPORT: &str = "support";
    pub const RESISTANCE: &str = "resistance";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorId {
    Rsi,
    Sma,
    Ema,
    Macd,
    Bbands,
    Adx,
    Atr,
    Stoch,
    #[serde(rename = "stochrsi")]
    StochRsi,
    Obv,
    SupportResistance,
}

impl IndicatorId {
    pub const ALL: [IndicatorId; 11] = [
        IndicatorId::Rsi,
        IndicatorId::Sma,
        IndicatorId::Ema,
        IndicatorId::Macd,
        IndicatorId::Bbands,
        IndicatorId::Adx,
        IndicatorId::Atr,
        IndicatorId::Stoch,
        IndicatorId::StochRsi,
        IndicatorId::Obv,
        IndicatorId::SupportResistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorId::Rsi => "rsi",
            IndicatorId::Sma => "sma",
            IndicatorId::Ema => "ema",
            IndicatorId::Macd => "macd",
            IndicatorId::Bbands => "bbands",
            IndicatorId::Adx => "adx",
            IndicatorId::Atr => "atr",
            IndicatorId::Stoch => "stoch",
            IndicatorId::StochRsi => "stochrsi",
            IndicatorId::Obv => "obv",
            IndicatorId::SupportResistance => "support_resistance",
        }
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIndicator(pub String);

impl fmt::Display for UnknownIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown indicator id '{}'", self.0)
    }
}

impl std::error::Error for UnknownIndicator {}

impl FromStr for IndicatorId {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        IndicatorId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| UnknownIndicator(s.to_string()))
    }
}

/// A point-in-time annotation tied to one candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub index: usize,
    pub timestamp: i64,
    pub label: String,
    pub detail: String,
    pub color_tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Watch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternHint {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// Plain-language reading of the latest value of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub indicator: String,
    pub title: String,
    pub description: String,
    pub sentiment: Sentiment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
