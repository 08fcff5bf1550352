//! Engine configuration.
//!
//! [`TimeframeConfig`] is the loose, file-friendly description of a timeframe
//! (`kind` plus optional size/unit fields). It is validated into a
//! [`Timeframe`] before the engine is built; every invalid combination is a
//! [`ConfigError`].

use std::collections::HashSet;
use std::path::Path;

use candlewick_types::{CalendarUnit, ConfigError, Result, Timeframe};
use serde::{Deserialize, Serialize};

/// Bucketing family of a configured timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeframeKind {
    /// Fixed number of seconds per bar.
    Duration,
    /// Bars follow calendar boundaries.
    Calendar,
}

/// One timeframe as written in a configuration file.
///
/// ```json
/// { "name": "1m", "kind": "duration", "size_seconds": 60 }
/// { "name": "5y", "kind": "calendar", "calendar_type": "multi-year", "years_span": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeConfig {
    /// Stable lookup name.
    pub name: String,
    /// Bucketing family.
    pub kind: TimeframeKind,
    /// Bar length for duration timeframes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_seconds: Option<i64>,
    /// Calendar unit for calendar timeframes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_type: Option<String>,
    /// Span in years for `multi-year` calendar timeframes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_span: Option<i64>,
}

impl TimeframeConfig {
    /// Describes a duration timeframe.
    #[must_use]
    pub fn duration(name: impl Into<String>, size_seconds: i64) -> Self {
        Self {
            name: name.into(),
            kind: TimeframeKind::Duration,
            size_seconds: Some(size_seconds),
            calendar_type: None,
            years_span: None,
        }
    }

    /// Describes a calendar timeframe.
    #[must_use]
    pub fn calendar(name: impl Into<String>, calendar_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TimeframeKind::Calendar,
            size_seconds: None,
            calendar_type: Some(calendar_type.into()),
            years_span: None,
        }
    }

    /// Describes a multi-year calendar timeframe.
    #[must_use]
    pub fn multi_year(name: impl Into<String>, years_span: i64) -> Self {
        Self {
            years_span: Some(years_span),
            ..Self::calendar(name, "multi-year")
        }
    }
}

impl TryFrom<&TimeframeConfig> for Timeframe {
    type Error = ConfigError;

    fn try_from(config: &TimeframeConfig) -> std::result::Result<Self, Self::Error> {
        let name = config.name.as_str();
        let conflict = |field| ConfigError::ConflictingField {
            name: name.to_string(),
            field,
        };

        match config.kind {
            TimeframeKind::Duration => {
                if config.calendar_type.is_some() {
                    return Err(conflict("calendar_type"));
                }
                if config.years_span.is_some() {
                    return Err(conflict("years_span"));
                }
                let seconds = config.size_seconds.ok_or_else(|| {
                    ConfigError::MissingDuration {
                        name: name.to_string(),
                    }
                })?;
                Self::duration(name, seconds)
            }
            TimeframeKind::Calendar => {
                if config.size_seconds.is_some() {
                    return Err(conflict("size_seconds"));
                }
                let unit = config.calendar_type.as_deref().ok_or_else(|| {
                    ConfigError::MissingCalendarUnit {
                        name: name.to_string(),
                    }
                })?;
                let unit = CalendarUnit::from_parts(name, unit, config.years_span)?;
                Self::calendar(name, unit)
            }
        }
    }
}

/// Full engine configuration: the ordered list of timeframes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Timeframes maintained for every symbol.
    pub timeframes: Vec<TimeframeConfig>,
}

impl EngineConfig {
    /// Creates a configuration from a list of timeframes.
    #[must_use]
    pub const fn new(timeframes: Vec<TimeframeConfig>) -> Self {
        Self { timeframes }
    }

    /// Returns the reference configuration.
    ///
    /// Microstructure bars (1s to 30s), standard intraday bars (1m to 1h),
    /// calendar bars (day to year) and multi-year bars (2y, 5y, 10y).
    #[must_use]
    pub fn reference() -> Self {
        Self::new(vec![
            TimeframeConfig::duration("1s", 1),
            TimeframeConfig::duration("2s", 2),
            TimeframeConfig::duration("5s", 5),
            TimeframeConfig::duration("10s", 10),
            TimeframeConfig::duration("12s", 12),
            TimeframeConfig::duration("30s", 30),
            TimeframeConfig::duration("1m", 60),
            TimeframeConfig::duration("5m", 300),
            TimeframeConfig::duration("15m", 900),
            TimeframeConfig::duration("1h", 3600),
            TimeframeConfig::calendar("day", "day"),
            TimeframeConfig::calendar("week", "week"),
            TimeframeConfig::calendar("month", "month"),
            TimeframeConfig::calendar("quarter", "quarter"),
            TimeframeConfig::calendar("year", "year"),
            TimeframeConfig::multi_year("2y", 2),
            TimeframeConfig::multi_year("5y", 5),
            TimeframeConfig::multi_year("10y", 10),
        ])
    }

    /// Parses a configuration from JSON.
    ///
    /// The timeframes are validated eagerly, so a file that parses is
    /// guaranteed to build an engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any timeframe is invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.build_timeframes()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates every entry and returns the timeframes in configured order.
    ///
    /// # Errors
    ///
    /// Returns the first invalid timeframe or duplicated name.
    pub fn build_timeframes(&self) -> std::result::Result<Vec<Timeframe>, ConfigError> {
        let timeframes = self
            .timeframes
            .iter()
            .map(Timeframe::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        ensure_unique_names(&timeframes)?;
        Ok(timeframes)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// Fails on the first name that appears twice.
pub(crate) fn ensure_unique_names(timeframes: &[Timeframe]) -> std::result::Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(timeframes.len());
    for tf in timeframes {
        if !seen.insert(tf.name()) {
            return Err(ConfigError::DuplicateName(tf.name().to_string()));
        }
    }
    Ok(())
}
