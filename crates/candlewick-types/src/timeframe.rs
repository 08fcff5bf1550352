//! Timeframe definitions.
//!
//! A [`Timeframe`] pairs a stable lookup name with a [`TimeframeRule`]. Rules
//! are a closed sum type, so a duration without a size or a multi-year span of
//! zero cannot be represented once a timeframe has been built.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::ConfigError;

/// Largest accepted multi-year span.
///
/// Keeps every bucket of a present-day timestamp within chrono's date range.
pub const MAX_YEARS_SPAN: u32 = 10_000;

/// Calendar unit for calendar-aligned buckets, evaluated in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    /// Midnight to midnight.
    Day,
    /// ISO week, Monday midnight to the following Monday.
    Week,
    /// First of the month to the first of the next month.
    Month,
    /// Jan-Mar, Apr-Jun, Jul-Sep, Oct-Dec.
    Quarter,
    /// Jan 1 to Jan 1.
    Year,
    /// Blocks of `span` years starting on years divisible by `span`.
    MultiYear {
        /// Number of years per bucket.
        span: NonZeroU32,
    },
}

impl CalendarUnit {
    /// Parses a calendar unit name as used in configuration files.
    ///
    /// `multi-year` requires a span; the other units ignore it being absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is unknown or the span is invalid.
    pub fn from_parts(
        name: &str,
        unit: &str,
        years_span: Option<i64>,
    ) -> Result<Self, ConfigError> {
        let unit = match unit.to_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "quarter" => Self::Quarter,
            "year" => Self::Year,
            "multi-year" | "multi_year" | "multiyear" => {
                let span = years_span
                    .and_then(|s| u32::try_from(s).ok())
                    .and_then(NonZeroU32::new)
                    .filter(|s| s.get() <= MAX_YEARS_SPAN)
                    .ok_or_else(|| ConfigError::InvalidYearsSpan {
                        name: name.to_string(),
                        span: years_span,
                    })?;
                return Ok(Self::MultiYear { span });
            }
            _ => {
                return Err(ConfigError::UnknownCalendarUnit {
                    name: name.to_string(),
                    unit: unit.to_string(),
                });
            }
        };

        if years_span.is_some() {
            return Err(ConfigError::ConflictingField {
                name: name.to_string(),
                field: "years_span",
            });
        }
        Ok(unit)
    }

    /// Returns the configuration name of the unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::MultiYear { .. } => "multi-year",
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiYear { span } => write!(f, "{span}-year"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Bucketing rule of a timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeRule {
    /// Fixed-length buckets aligned to multiples of `seconds` since the epoch.
    Duration {
        /// Bucket length in seconds.
        seconds: NonZeroU32,
    },
    /// Calendar-aligned buckets.
    Calendar(CalendarUnit),
}

impl TimeframeRule {
    /// Returns the bucket length for duration rules, or None for calendar rules.
    #[must_use]
    pub const fn seconds(&self) -> Option<u32> {
        match self {
            Self::Duration { seconds } => Some(seconds.get()),
            Self::Calendar(_) => None,
        }
    }

    /// Returns true for calendar-aligned rules.
    #[must_use]
    pub const fn is_calendar(&self) -> bool {
        matches!(self, Self::Calendar(_))
    }
}

impl fmt::Display for TimeframeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration { seconds } => write!(f, "duration {seconds}s"),
            Self::Calendar(unit) => write!(f, "calendar {unit}"),
        }
    }
}

/// A named bucketing rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timeframe {
    name: String,
    rule: TimeframeRule,
}

impl Timeframe {
    /// Creates a timeframe from a name and rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or a multi-year span exceeds
    /// [`MAX_YEARS_SPAN`].
    pub fn new(name: impl Into<String>, rule: TimeframeRule) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if let TimeframeRule::Calendar(CalendarUnit::MultiYear { span }) = rule
            && span.get() > MAX_YEARS_SPAN
        {
            return Err(ConfigError::InvalidYearsSpan {
                name,
                span: Some(i64::from(span.get())),
            });
        }
        Ok(Self { name, rule })
    }

    /// Creates a duration timeframe of `seconds` per bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or `seconds` is not in
    /// `1..=u32::MAX`.
    pub fn duration(name: impl Into<String>, seconds: i64) -> Result<Self, ConfigError> {
        let name = name.into();
        let Some(size) = u32::try_from(seconds).ok().and_then(NonZeroU32::new) else {
            return Err(ConfigError::InvalidDuration { name, seconds });
        };
        Self::new(name, TimeframeRule::Duration { seconds: size })
    }

    /// Creates a calendar timeframe.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn calendar(name: impl Into<String>, unit: CalendarUnit) -> Result<Self, ConfigError> {
        Self::new(name, TimeframeRule::Calendar(unit))
    }

    /// Creates a multi-year calendar timeframe of `span` years per bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or `span` is not in
    /// `1..=MAX_YEARS_SPAN`.
    pub fn multi_year(name: impl Into<String>, span: i64) -> Result<Self, ConfigError> {
        let name = name.into();
        let unit = CalendarUnit::from_parts(&name, "multi-year", Some(span))?;
        Self::calendar(name, unit)
    }

    /// Returns the lookup name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bucketing rule.
    #[must_use]
    pub const fn rule(&self) -> &TimeframeRule {
        &self.rule
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parses compact names such as `5s`, `15m`, `1h`, `month` or `5y`.
///
/// The parsed timeframe keeps the input string as its name.
impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidTimeframe(s.to_string());
        let lower = s.trim().to_lowercase();

        match lower.as_str() {
            "day" | "week" | "month" | "quarter" | "year" => {
                let unit = CalendarUnit::from_parts(s, &lower, None)?;
                return Self::calendar(s, unit);
            }
            "" => return Err(invalid()),
            _ => {}
        }

        let split = lower.char_indices().next_back().map_or(0, |(i, _)| i);
        let (count, suffix) = lower.split_at(split);
        let count: i64 = count.parse().map_err(|_| invalid())?;
        match suffix {
            "s" => Self::duration(s, count),
            "m" => Self::duration(s, count.checked_mul(60).ok_or_else(invalid)?),
            "h" => Self::duration(s, count.checked_mul(3600).ok_or_else(invalid)?),
            "y" if count == 1 => Self::calendar(s, CalendarUnit::Year),
            "y" => Self::multi_year(s, count),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_rejects_non_positive() {
        assert!(matches!(
            Timeframe::duration("bad", 0),
            Err(ConfigError::InvalidDuration { seconds: 0, .. })
        ));
        assert!(matches!(
            Timeframe::duration("bad", -5),
            Err(ConfigError::InvalidDuration { seconds: -5, .. })
        ));
        assert_eq!(
            Timeframe::duration("1m", 60).unwrap().rule().seconds(),
            Some(60)
        );
    }

    #[test]
    fn test_multi_year_rejects_non_positive() {
        assert!(matches!(
            Timeframe::multi_year("0y", 0),
            Err(ConfigError::InvalidYearsSpan { span: Some(0), .. })
        ));
        let tf = Timeframe::multi_year("5y", 5).unwrap();
        assert_eq!(
            tf.rule(),
            &TimeframeRule::Calendar(CalendarUnit::MultiYear {
                span: NonZeroU32::new(5).unwrap()
            })
        );
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            Timeframe::calendar("  ", CalendarUnit::Day),
            Err(ConfigError::EmptyName)
        );
    }

    #[test]
    fn test_multi_year_rejects_oversized_span() {
        assert!(matches!(
            CalendarUnit::from_parts("big", "multi-year", Some(1_000_000)),
            Err(ConfigError::InvalidYearsSpan {
                span: Some(1_000_000),
                ..
            })
        ));
        assert!(Timeframe::multi_year("max", i64::from(MAX_YEARS_SPAN)).is_ok());
        assert!(Timeframe::multi_year("over", i64::from(MAX_YEARS_SPAN) + 1).is_err());

        let unit = CalendarUnit::MultiYear {
            span: NonZeroU32::new(MAX_YEARS_SPAN + 1).unwrap(),
        };
        assert!(matches!(
            Timeframe::calendar("direct", unit),
            Err(ConfigError::InvalidYearsSpan { .. })
        ));
    }

    #[test]
    fn test_calendar_unit_from_parts() {
        assert_eq!(
            CalendarUnit::from_parts("q", "Quarter", None),
            Ok(CalendarUnit::Quarter)
        );
        assert!(matches!(
            CalendarUnit::from_parts("fortnight", "fortnight", None),
            Err(ConfigError::UnknownCalendarUnit { .. })
        ));
        assert!(matches!(
            CalendarUnit::from_parts("2y", "multi-year", None),
            Err(ConfigError::InvalidYearsSpan { span: None, .. })
        ));
        assert!(matches!(
            CalendarUnit::from_parts("month", "month", Some(2)),
            Err(ConfigError::ConflictingField {
                field: "years_span",
                ..
            })
        ));
    }

    #[test]
    fn test_timeframe_parse() {
        let tf: Timeframe = "12s".parse().unwrap();
        assert_eq!(tf.name(), "12s");
        assert_eq!(tf.rule().seconds(), Some(12));

        assert_eq!("15m".parse::<Timeframe>().unwrap().rule().seconds(), Some(900));
        assert_eq!("1h".parse::<Timeframe>().unwrap().rule().seconds(), Some(3600));
        assert_eq!(
            "Month".parse::<Timeframe>().unwrap().rule(),
            &TimeframeRule::Calendar(CalendarUnit::Month)
        );
        assert_eq!(
            "1y".parse::<Timeframe>().unwrap().rule(),
            &TimeframeRule::Calendar(CalendarUnit::Year)
        );
        assert!("10y".parse::<Timeframe>().unwrap().rule().is_calendar());

        assert!("".parse::<Timeframe>().is_err());
        assert!("0s".parse::<Timeframe>().is_err());
        assert!("5x".parse::<Timeframe>().is_err());
        assert!("fortnight".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(
            Timeframe::duration("5m", 300).unwrap().rule().to_string(),
            "duration 300s"
        );
        assert_eq!(
            Timeframe::multi_year("2y", 2).unwrap().rule().to_string(),
            "calendar 2-year"
        );
        assert_eq!(
            TimeframeRule::Calendar(CalendarUnit::Week).to_string(),
            "calendar week"
        );
    }
}
