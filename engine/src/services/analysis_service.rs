// One stateless analysis pass: indicators, then events, pattern hints and insights.
use crate::analysis::{build_events, build_insights, build_readings, PatternScanner, Readings};
use crate::config::AnalysisSettings;
use crate::data::CandleCsvParser;
use crate::error::EngineError;
use crate::indicators::compute_indicators;
use serde::{Deserialize, Serialize};
use shared::models::{Candle, ComputedSeriesMap, Event, IndicatorId, Insight, ParameterSet, PatternHint};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AnalysisRequest {
    /// Indicator ids as typed by the caller; ids outside the catalog are reported and skipped.
    pub indicators: Vec<String>,
    #[serde(default)]
    pub parameters: ParameterSet,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub candle_count: usize,
    pub indicators: Vec<IndicatorId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_indicators: Vec<String>,
    pub series: ComputedSeriesMap,
    pub events: Vec<Event>,
    pub hints: Vec<PatternHint>,
    pub insights: Vec<Insight>,
    pub readings: Readings,
}

pub struct AnalysisService {
    settings: AnalysisSettings,
    scanner: PatternScanner,
}

impl AnalysisService {
    pub fn new(settings: AnalysisSettings) -> Self {
        let scanner = PatternScanner::new(settings.pattern_lookback);
        AnalysisService { settings, scanner }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn analyze(&self, candles: &[Candle], request: &AnalysisRequest) -> AnalysisReport {
        let mut indicators = Vec::new();
        let mut unknown_indicators = Vec::new();
        for name in &request.indicators {
            match name.parse::<IndicatorId>() {
                Ok(id) if !indicators.contains(&id) => indicators.push(id),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring indicator");
                    unknown_indicators.push(name.clone());
                }
            }
        }
        tracing::info!(candles = candles.len(), indicators = indicators.len(), "Running analysis");

        let series = compute_indicators(candles, &indicators, &request.parameters);

        let events = if self.settings.detect_events {
            build_events(candles, &series, &indicators)
        } else {
            Vec::new()
        };
        let hints = if self.settings.detect_patterns {
            self.scanner.scan(candles, &series, &indicators)
        } else {
            Vec::new()
        };
        let insights = build_insights(candles, &series, &indicators, &request.parameters);
        let readings = build_readings(candles, &series);
        tracing::debug!(
            events = events.len(),
            hints = hints.len(),
            insights = insights.len(),
            "Analysis finished"
        );

        AnalysisReport {
            candle_count: candles.len(),
            indicators,
            unknown_indicators,
            series,
            events,
            hints,
            insights,
            readings,
        }
    }

    pub fn analyze_csv(
        &self,
        path: impl AsRef<Path>,
        delimiter: char,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, EngineError> {
        let candles = CandleCsvParser::load_candles_from_csv(path, delimiter)?;
        Ok(self.analyze(&candles, request))
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new(AnalysisSettings::default())
    }
}
