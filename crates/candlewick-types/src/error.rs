//! Error types for candlewick.

use thiserror::Error;

/// Result type alias for candlewick operations.
pub type Result<T> = std::result::Result<T, CandlewickError>;

/// Errors that can occur while configuring or driving the candle engine.
#[derive(Error, Debug)]
pub enum CandlewickError {
    /// Invalid timeframe configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A tick was rejected.
    #[error(transparent)]
    InvalidTick(#[from] TickError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for timeframe definitions that cannot describe a valid bucketing rule.
///
/// These are raised while the engine is being built and are fatal to startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Timeframe name is empty.
    #[error("Timeframe name must not be empty")]
    EmptyName,

    /// The same name was configured twice.
    #[error("Duplicate timeframe name '{0}'")]
    DuplicateName(String),

    /// Duration timeframe without a size.
    #[error("Duration timeframe '{name}' has no size_seconds")]
    MissingDuration {
        /// The offending timeframe.
        name: String,
    },

    /// Duration size is zero, negative or too large.
    #[error("Duration timeframe '{name}' has invalid size {seconds}s")]
    InvalidDuration {
        /// The offending timeframe.
        name: String,
        /// The configured size.
        seconds: i64,
    },

    /// Calendar timeframe without a calendar type.
    #[error("Calendar timeframe '{name}' has no calendar_type")]
    MissingCalendarUnit {
        /// The offending timeframe.
        name: String,
    },

    /// Calendar type is not one of the supported units.
    #[error(
        "Calendar timeframe '{name}' has unknown calendar_type '{unit}', expected one of: day, week, month, quarter, year, multi-year"
    )]
    UnknownCalendarUnit {
        /// The offending timeframe.
        name: String,
        /// The unrecognized unit.
        unit: String,
    },

    /// Multi-year span is missing, zero, negative or too large.
    #[error("Multi-year timeframe '{name}' has invalid years_span {span:?}")]
    InvalidYearsSpan {
        /// The offending timeframe.
        name: String,
        /// The configured span, if any.
        span: Option<i64>,
    },

    /// A field belonging to the other timeframe kind was set.
    #[error("Timeframe '{name}' sets '{field}', which does not apply to its kind")]
    ConflictingField {
        /// The offending timeframe.
        name: String,
        /// The field that should be absent.
        field: &'static str,
    },

    /// Compact timeframe string could not be parsed.
    #[error(
        "invalid timeframe '{0}', expected <n>s, <n>m, <n>h, <n>y, day, week, month, quarter or year"
    )]
    InvalidTimeframe(String),
}

/// Reasons a tick is rejected by the engine.
///
/// A rejected tick never mutates any bar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickError {
    /// Price is NaN or infinite.
    #[error("Invalid tick for {symbol}: price {price} is not finite")]
    NonFinitePrice {
        /// Symbol of the rejected tick.
        symbol: String,
        /// The rejected price.
        price: f64,
    },

    /// Volume is NaN, infinite or negative.
    #[error("Invalid tick for {symbol}: volume {volume} must be finite and non-negative")]
    InvalidVolume {
        /// Symbol of the rejected tick.
        symbol: String,
        /// The rejected volume.
        volume: f64,
    },

    /// Timestamp cannot be placed in a bucket for every timeframe.
    #[error("Invalid tick for {symbol}: timestamp {timestamp} is out of range")]
    TimestampOutOfRange {
        /// Symbol of the rejected tick.
        symbol: String,
        /// The rejected timestamp (epoch seconds).
        timestamp: i64,
    },
}
