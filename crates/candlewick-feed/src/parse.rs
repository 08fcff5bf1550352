//! Line-oriented decoding of feed payloads into ticks.

use std::fmt;
use std::str::FromStr;

use candlewick_types::Tick;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while decoding a feed line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line is not valid JSON for the expected shape.
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// CSV row has the wrong number of fields.
    #[error("Expected {expected} CSV fields, found {found}")]
    FieldCount {
        /// Number of fields required.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid {field}: '{value}'")]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// The raw text.
        value: String,
    },

    /// Unknown input format name.
    #[error("Unknown input format '{0}', expected one of: auto, tick, trade, csv")]
    UnknownFormat(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

/// Shape of the lines being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFormat {
    /// Detect per line: JSON objects with `data` or `type` are trade frames,
    /// other JSON objects are ticks, anything else is CSV.
    #[default]
    Auto,
    /// One tick object per line: `{"symbol","price","volume","timestamp"}`.
    Tick,
    /// Exchange trade frames: `{"type":"trade","data":[{"s","p","v","t"}]}`
    /// with millisecond timestamps.
    Trade,
    /// `symbol,price,volume,timestamp` rows; a `symbol,...` header is skipped.
    Csv,
}

impl InputFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Tick => "tick",
            Self::Trade => "trade",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "tick" | "ticks" | "ndjson" | "jsonl" => Ok(Self::Tick),
            "trade" | "trades" | "frame" => Ok(Self::Trade),
            "csv" => Ok(Self::Csv),
            _ => Err(ParseError::UnknownFormat(s.to_string())),
        }
    }
}

/// Decodes feed lines of a given [`InputFormat`].
///
/// Decoding checks shape only. Values that parse but cannot be aggregated
/// (a `NaN` price, a negative volume) are left for the engine to reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDecoder {
    format: InputFormat,
}

impl LineDecoder {
    /// Creates a decoder for the given format.
    #[must_use]
    pub const fn new(format: InputFormat) -> Self {
        Self { format }
    }

    /// Returns the configured format.
    #[must_use]
    pub const fn format(&self) -> InputFormat {
        self.format
    }

    /// Decodes one line into zero or more ticks.
    ///
    /// Blank lines, CSV headers and frames without trades yield no ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not match the expected shape.
    pub fn decode(&self, line: &str) -> Result<Vec<Tick>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Vec::new());
        }

        match self.format {
            InputFormat::Auto => decode_auto(line),
            InputFormat::Tick => decode_tick(line).map(|tick| vec![tick]),
            InputFormat::Trade => decode_trade_frame(line),
            InputFormat::Csv => Ok(decode_csv_row(line)?.into_iter().collect()),
        }
    }
}

fn decode_auto(line: &str) -> Result<Vec<Tick>, ParseError> {
    if !line.starts_with('{') {
        return Ok(decode_csv_row(line)?.into_iter().collect());
    }

    let value: serde_json::Value = serde_json::from_str(line)?;
    let is_frame = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("data") || obj.contains_key("type"));
    if is_frame {
        let frame: TradeFrame = serde_json::from_value(value)?;
        Ok(frame.into_ticks())
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

/// Decodes a single tick object.
///
/// # Errors
///
/// Returns an error if the line is not a tick object.
pub fn decode_tick(line: &str) -> Result<Tick, ParseError> {
    Ok(serde_json::from_str(line)?)
}

/// Decodes an exchange trade frame into ticks.
///
/// Millisecond timestamps are floored to seconds and a missing volume counts
/// as zero. Frames without a `data` array (pings, acknowledgements) yield no
/// ticks.
///
/// # Errors
///
/// Returns an error if the line is not a trade frame.
pub fn decode_trade_frame(line: &str) -> Result<Vec<Tick>, ParseError> {
    let frame: TradeFrame = serde_json::from_str(line)?;
    Ok(frame.into_ticks())
}

/// Decodes a `symbol,price,volume,timestamp` row.
///
/// Returns `None` for the header row. An empty volume counts as zero.
///
/// # Errors
///
/// Returns an error if the row has the wrong number of fields or a number
/// does not parse.
pub fn decode_csv_row(line: &str) -> Result<Option<Tick>, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(ParseError::FieldCount {
            expected: 4,
            found: fields.len(),
        });
    }
    if fields[0].eq_ignore_ascii_case("symbol") {
        return Ok(None);
    }

    let price = parse_number("price", fields[1])?;
    let volume = if fields[2].is_empty() {
        0.0
    } else {
        parse_number("volume", fields[2])?
    };
    let timestamp = parse_number("timestamp", fields[3])?;

    Ok(Some(Tick::new(fields[0], price, volume, timestamp)))
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct TradeFrame {
    #[serde(default)]
    data: Option<Vec<TradeEntry>>,
}

#[derive(Debug, Deserialize)]
struct TradeEntry {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "p")]
    price: f64,
    #[serde(rename = "v", default)]
    volume: Option<f64>,
    #[serde(rename = "t")]
    timestamp_ms: i64,
}

impl TradeFrame {
    fn into_ticks(self) -> Vec<Tick> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                Tick::new(
                    entry.symbol,
                    entry.price,
                    entry.volume.unwrap_or(0.0),
                    entry.timestamp_ms.div_euclid(1000),
                )
            })
            .collect()
    }
}
