// Dashboard readings: trend and momentum scores, volatility figures, ATR stops and an EMA/RSI checklist.
use super::{sub_series, value_at};
use crate::indicators::bbands::band_width_pct;
use crate::indicators::finite;
use serde::Serialize;
use shared::models::{series_keys, Candle, ComputedSeriesMap, IndicatorId, Series};

/// EMA slope is measured against the value this many candles back.
pub const SLOPE_LOOKBACK: usize = 5;
const SLOPE_SCALE: f64 = 8.0;
const CONSTRUCTIVE_RSI: f64 = 60.0;
const DEFENSIVE_RSI: f64 = 40.0;
const CONSERVATIVE_ATR_MULTIPLE: f64 = 2.0;
const BALANCED_ATR_MULTIPLE: f64 = 1.5;
/// Price within this fraction of the EMA counts as hugging it.
const NEAR_EMA_FRACTION: f64 = 0.01;
const CHECKLIST_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    /// 0..=100
    pub score: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopDistances {
    pub conservative: f64,
    pub balanced: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub title: String,
    pub body: String,
    pub kind: ChecklistKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readings {
    pub trend: Option<Score>,
    pub momentum: Option<Score>,
    pub atr_pct: Option<f64>,
    pub band_width_pct: Option<f64>,
    pub stop_distances: Option<StopDistances>,
    pub checklist: Vec<ChecklistItem>,
}

fn last_valid(series: Option<&Series>) -> Option<f64> {
    series?.iter().rev().find_map(|v| finite(*v))
}

fn item(title: &str, body: &str, kind: ChecklistKind) -> ChecklistItem {
    ChecklistItem { title: title.to_string(), body: body.to_string(), kind }
}

/// Scores and figures read from whatever EMA, RSI, ATR and Bollinger series are present.
///
/// Scores and volatility figures use the last defined value of each series; the checklist reads the
/// values at the final candle only.
pub fn build_readings(candles: &[Candle], series: &ComputedSeriesMap) -> Readings {
    let Some(last_candle) = candles.last() else {
        return Readings::default();
    };
    let close = finite(Some(last_candle.close));
    let ema = sub_series(series, IndicatorId::Ema, series_keys::VALUE);
    let rsi = sub_series(series, IndicatorId::Rsi, series_keys::VALUE);
    let atr_now = last_valid(sub_series(series, IndicatorId::Atr, series_keys::VALUE));

    let ema_now = last_valid(ema);
    let ema_prev = ema.filter(|s| s.len() > SLOPE_LOOKBACK).and_then(|s| value_at(s, s.len() - 1 - SLOPE_LOOKBACK));
    let trend = match (ema_now, ema_prev.filter(|p| *p != 0.0), close) {
        (Some(now), Some(prev), Some(close)) => finite(Some((now - prev) / prev * 100.0)).map(|slope_pct| {
            let label = if close > now { "Uptrend context" } else { "Downtrend context" };
            Score { score: (slope_pct.abs() * SLOPE_SCALE).clamp(0.0, 100.0), label: label.to_string() }
        }),
        _ => None,
    };

    let momentum = last_valid(rsi).map(|rsi_now| {
        let label = if rsi_now > CONSTRUCTIVE_RSI {
            "Constructive momentum"
        } else if rsi_now < DEFENSIVE_RSI {
            "Defensive momentum"
        } else {
            "Balanced momentum"
        };
        Score { score: ((rsi_now - 50.0) / 50.0 * 50.0 + 50.0).clamp(0.0, 100.0), label: label.to_string() }
    });

    let atr_pct = match (atr_now, close.filter(|c| *c != 0.0)) {
        (Some(atr), Some(close)) => finite(Some(atr / close * 100.0)),
        _ => None,
    };

    let band_width_pct = band_width_pct(
        last_valid(sub_series(series, IndicatorId::Bbands, series_keys::UPPER)),
        last_valid(sub_series(series, IndicatorId::Bbands, series_keys::MIDDLE)),
        last_valid(sub_series(series, IndicatorId::Bbands, series_keys::LOWER)),
    );

    let stop_distances = atr_now.zip(close).map(|(atr, close)| StopDistances {
        conservative: close - atr * CONSERVATIVE_ATR_MULTIPLE,
        balanced: close - atr * BALANCED_ATR_MULTIPLE,
    });

    let last = candles.len() - 1;
    let checklist = match (ema.and_then(|s| value_at(s, last)), rsi.and_then(|s| value_at(s, last)), close) {
        (Some(ema), Some(rsi), Some(close)) => checklist(close, ema, rsi),
        _ => vec![item(
            "Add EMA + RSI",
            "Trend and momentum checklists need EMA and RSI selected.",
            ChecklistKind::Info,
        )],
    };

    Readings { trend, momentum, atr_pct, band_width_pct, stop_distances, checklist }
}

fn checklist(close: f64, ema: f64, rsi: f64) -> Vec<ChecklistItem> {
    let mut items = Vec::new();
    let price_above = close > ema;
    let near_ema = ema != 0.0 && ((close - ema) / ema).abs() < NEAR_EMA_FRACTION;

    if price_above && rsi > 50.0 {
        items.push(item(
            "Uptrend context",
            "Price above EMA and RSI > 50; continuation setups often live here.",
            ChecklistKind::Info,
        ));
    }
    if !price_above && rsi < 50.0 {
        items.push(item(
            "Downtrend context",
            "Price below EMA and RSI < 50; rallies can fail at the EMA.",
            ChecklistKind::Warning,
        ));
    }
    if near_ema && rsi > 45.0 && rsi < 55.0 {
        items.push(item(
            "Range-like chop",
            "Price near EMA with RSI around 50; breakouts can whipsaw in ranges.",
            ChecklistKind::Info,
        ));
    }
    items.truncate(CHECKLIST_LIMIT);
    items
}
