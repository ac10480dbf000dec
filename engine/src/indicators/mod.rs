// Technical indicators module
pub mod adx;
pub mod atr;
pub mod bbands;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stoch;
pub mod stochrsi;
pub mod support_resistance;

pub use adx::Adx;
pub use atr::Atr;
pub use bbands::BollingerBands;
pub use ema::Ema;
pub use macd::Macd;
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stoch::Stochastic;
pub use stochrsi::StochRsi;
pub use support_resistance::SupportResistance;

use crate::catalog::{self, ResolvedParameters};
use serde_json::Value;
use shared::models::{Candle, ComputedSeriesMap, IndicatorId, IndicatorSeries, ParameterSet, Series};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn id(&self) -> IndicatorId;
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    /// Every returned sub-series has exactly `data.len()` entries.
    fn calculate(&self, data: &[Candle]) -> IndicatorSeries;
}

pub fn build_calculator(id: IndicatorId, params: &ResolvedParameters) -> Box<dyn IndicatorCalculator> {
    match id {
        IndicatorId::Sma => Box::new(Sma::new(params.period("period"))),
        IndicatorId::Ema => Box::new(Ema::new(params.period("period"))),
        IndicatorId::Rsi => Box::new(Rsi::new(params.period("period"))),
        IndicatorId::Macd => Box::new(Macd::new(
            params.period("fastPeriod"),
            params.period("slowPeriod"),
            params.period("signalPeriod"),
        )),
        IndicatorId::Bbands => Box::new(BollingerBands::new(params.period("period"), params.get("stdDev"))),
        IndicatorId::Adx => Box::new(Adx::new(params.period("period"))),
        IndicatorId::Atr => Box::new(Atr::new(params.period("period"))),
        IndicatorId::Stoch => Box::new(Stochastic::new(params.period("kPeriod"), params.period("dPeriod"))),
        IndicatorId::StochRsi => Box::new(StochRsi::new(params.period("period"))),
        IndicatorId::Obv => Box::new(Obv::new()),
        IndicatorId::SupportResistance => Box::new(SupportResistance::new()),
    }
}

/// Runs every selected indicator over `candles`, filling missing parameters from the catalog.
pub fn compute_indicators(
    candles: &[Candle],
    selected: &[IndicatorId],
    parameters: &ParameterSet,
) -> ComputedSeriesMap {
    let mut computed = ComputedSeriesMap::new();
    for &id in selected {
        if computed.contains_key(&id) {
            continue;
        }
        let params = catalog::resolve_parameters(id, parameters);
        let calculator = build_calculator(id, &params);
        tracing::debug!(indicator = %id, name = calculator.name(), candles = candles.len(), "Calculating indicator");
        computed.insert(id, calculator.calculate(candles));
    }
    computed
}

/// Same as [`compute_indicators`] for string ids; ids outside the catalog are skipped.
pub fn compute_indicators_by_name<S: AsRef<str>>(
    candles: &[Candle],
    selected: &[S],
    parameters: &ParameterSet,
) -> ComputedSeriesMap {
    let ids = parse_indicator_ids(selected);
    compute_indicators(candles, &ids, parameters)
}

pub fn parse_indicator_ids<S: AsRef<str>>(names: &[S]) -> Vec<IndicatorId> {
    names
        .iter()
        .filter_map(|name| match name.as_ref().parse::<IndicatorId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping indicator");
                None
            }
        })
        .collect()
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Mean of a window; `None` if any member is undefined or non-finite.
pub(crate) fn window_mean(window: &[Option<f64>]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let mut sum = 0.0;
    for value in window {
        sum += finite(*value)?;
    }
    finite(Some(sum / window.len() as f64))
}

/// Lowest and highest member of a window; `None` if any member is undefined or non-finite.
pub(crate) fn window_bounds(window: impl IntoIterator<Item = Option<f64>>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for value in window {
        let v = finite(value)?;
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    bounds
}

pub(crate) fn to_options(values: &[f64]) -> Series {
    values.iter().map(|v| Some(*v)).collect()
}
