//! Output format abstraction.

use candlewick_aggregate::BarView;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON array format.
    #[default]
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// CSV format.
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl OutputFormat {
    /// Returns the name accepted by [`FromStr`](std::str::FromStr).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Bar start cannot be rendered as a calendar time.
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One candle snapshot labelled with its symbol and timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleRecord {
    /// Instrument symbol.
    pub symbol: String,
    /// Timeframe name.
    #[serde(rename = "tf")]
    pub timeframe: String,
    /// The bar snapshot.
    #[serde(flatten)]
    pub view: BarView,
}

impl CandleRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(symbol: impl Into<String>, timeframe: impl Into<String>, view: BarView) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            view,
        }
    }
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes candle snapshots to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_candles<W: Write + Send>(
        &self,
        candles: &[CandleRecord],
        writer: W,
    ) -> Result<(), FormatError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlewick_aggregate::{Bar, Bounds};

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!(matches!(
            "parquet".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
        assert_eq!("tsv".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
        assert_eq!(OutputFormat::Ndjson.to_string(), "ndjson");
    }

    #[test]
    fn test_record_flattens_view() {
        let bar = Bar::new(Bounds::new(1_704_110_400, 1_704_110_460), 10.5, 2.0);
        let record = CandleRecord::new("AAPL", "1m", bar.snapshot(1_704_110_415));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["symbol"], "AAPL");
        assert_eq!(value["tf"], "1m");
        assert_eq!(value["t"], "2024-01-01T12:00:00Z");
        assert_eq!(value["o"], 10.5);
        assert_eq!(value["elapsed"], 15);
        assert_eq!(value["remaining"], 45);
        assert_eq!(value["complete"], false);
    }
}
