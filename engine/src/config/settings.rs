// Engine settings, loaded from a JSON file or taken from the defaults below
use crate::analysis::patterns::DEFAULT_LOOKBACK;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use shared::models::ParameterSet;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub data: DataSettings,
    pub analysis: AnalysisSettings,
    /// Indicator ids analysed when the caller names none.
    pub indicators: Vec<String>,
    pub parameters: ParameterSet,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub csv_delimiter: char,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    pub pattern_lookback: usize,
    pub detect_events: bool,
    pub detect_patterns: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            data: DataSettings::default(),
            analysis: AnalysisSettings::default(),
            indicators: vec!["rsi".to_string(), "macd".to_string(), "bbands".to_string(), "ema".to_string()],
            parameters: ParameterSet::new(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings { csv_delimiter: ',' }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            pattern_lookback: DEFAULT_LOOKBACK,
            detect_events: true,
            detect_patterns: true,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    /// The settings shipped with the repository.
    pub fn bundled() -> Result<Self, EngineError> {
        Self::from_json(include_str!("../../config/default.json"))
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !self.data.csv_delimiter.is_ascii() {
            return Err(EngineError::ConfigError(format!(
                "csv_delimiter '{}' must be an ASCII character",
                self.data.csv_delimiter
            )));
        }
        if self.analysis.pattern_lookback < 3 {
            return Err(EngineError::ConfigError(format!(
                "pattern_lookback must be at least 3, got {}",
                self.analysis.pattern_lookback
            )));
        }
        Ok(())
    }
}
