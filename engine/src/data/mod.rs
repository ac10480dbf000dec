// Candle loading from local files
pub mod csv_parser;

pub use csv_parser::CandleCsvParser;
