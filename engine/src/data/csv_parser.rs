use crate::error::EngineError;
use chrono::DateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Accepts integer epoch milliseconds or an RFC 3339 string.
pub fn parse_timestamp(s: &str) -> Result<i64, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| format!("'{}' is neither epoch milliseconds nor RFC 3339 ({})", s, e))
}

pub struct CandleCsvParser;

impl CandleCsvParser {
    // Header: timestamp,open,high,low,close,volume (any column order, names are case-insensitive)
    pub fn load_candles_from_csv(file_path: impl AsRef<Path>, delimiter: char) -> Result<Vec<Candle>, EngineError> {
        let path = file_path.as_ref();
        let file = File::open(path)?;
        let candles = Self::load_candles_from_reader(BufReader::new(file), delimiter)?;
        tracing::info!(path = %path.display(), count = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }

    /// Parses candles and returns them sorted ascending with duplicate timestamps dropped.
    pub fn load_candles_from_reader<R: Read>(reader: R, delimiter: char) -> Result<Vec<Candle>, EngineError> {
        if !delimiter.is_ascii() {
            return Err(EngineError::ConfigError(format!(
                "CSV delimiter '{}' must be a single ASCII character",
                delimiter
            )));
        }
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut positions = [0usize; 6];
        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| EngineError::data_format(1, name, "missing column"))?;
        }

        let mut candles = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            candles.push(Self::parse_record(&record, &positions, line)?);
        }

        let parsed = candles.len();
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by_key(|c| c.timestamp);
        if candles.len() < parsed {
            tracing::warn!(dropped = parsed - candles.len(), "Dropped candles with duplicate timestamps");
        }
        Ok(candles)
    }

    fn parse_record(record: &StringRecord, positions: &[usize; 6], line: usize) -> Result<Candle, EngineError> {
        let field = |i: usize| {
            record
                .get(positions[i])
                .ok_or_else(|| EngineError::data_format(line, COLUMNS[i], "missing value"))
        };
        let number = |i: usize| -> Result<f64, EngineError> {
            let raw = field(i)?;
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(_) => Err(EngineError::data_format(line, COLUMNS[i], format!("'{}' is not finite", raw))),
                Err(e) => Err(EngineError::data_format(line, COLUMNS[i], format!("'{}': {}", raw, e))),
            }
        };

        let timestamp = parse_timestamp(field(0)?).map_err(|e| EngineError::data_format(line, COLUMNS[0], e))?;
        Ok(Candle {
            timestamp,
            open: number(1)?,
            high: number(2)?,
            low: number(3)?,
            close: number(4)?,
            volume: number(5)?,
        })
    }
}
