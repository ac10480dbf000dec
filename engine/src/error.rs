use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub(crate) fn data_format(line: usize, field: &str, detail: impl std::fmt::Display) -> Self {
        EngineError::CsvDataFormatError(format!("line {}, field '{}': {}", line, field, detail))
    }
}
