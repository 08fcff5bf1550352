//! Bucket boundary resolution.
//!
//! Maps a timestamp and a [`TimeframeRule`] to the half-open `[start, end)`
//! window containing it. Duration buckets sit on multiples of their size
//! since the epoch; calendar buckets follow UTC calendar boundaries. Neither
//! depends on when ingestion started, so bars for the same timeframe stay
//! phase-aligned across symbols.

use std::num::NonZeroU32;

use candlewick_types::{CalendarUnit, TimeframeRule};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Half-open bucket interval in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Inclusive start.
    pub start: i64,
    /// Exclusive end.
    pub end: i64,
}

impl Bounds {
    /// Creates a new interval.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Returns the interval length in seconds.
    #[must_use]
    pub const fn span(&self) -> i64 {
        self.end - self.start
    }

    /// Returns true if `timestamp` falls inside the interval.
    #[must_use]
    pub const fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// Resolves the bucket containing `timestamp` under `rule`.
///
/// Returns `None` when the bucket cannot be expressed: the timestamp lies
/// outside the representable calendar range, or the bucket end would
/// overflow.
#[must_use]
pub fn resolve_bounds(timestamp: i64, rule: &TimeframeRule) -> Option<Bounds> {
    match rule {
        TimeframeRule::Duration { seconds } => duration_bounds(timestamp, *seconds),
        TimeframeRule::Calendar(unit) => calendar_bounds(timestamp, *unit),
    }
}

fn duration_bounds(timestamp: i64, seconds: NonZeroU32) -> Option<Bounds> {
    let size = i64::from(seconds.get());
    // Euclidean remainder keeps pre-epoch starts on the same grid.
    let start = timestamp.checked_sub(timestamp.rem_euclid(size))?;
    let end = start.checked_add(size)?;
    Some(Bounds::new(start, end))
}

fn calendar_bounds(timestamp: i64, unit: CalendarUnit) -> Option<Bounds> {
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)?.date_naive();

    let (start, end) = match unit {
        CalendarUnit::Day => (date, date.succ_opt()?),
        CalendarUnit::Week => {
            let back = u64::from(date.weekday().num_days_from_monday());
            let start = date.checked_sub_days(Days::new(back))?;
            (start, start.checked_add_days(Days::new(7))?)
        }
        CalendarUnit::Month => {
            let start = first_of_month(date.year(), date.month())?;
            (start, start.checked_add_months(Months::new(1))?)
        }
        CalendarUnit::Quarter => {
            let first_month = date.month0() / 3 * 3 + 1;
            let start = first_of_month(date.year(), first_month)?;
            (start, start.checked_add_months(Months::new(3))?)
        }
        CalendarUnit::Year => (
            first_of_month(date.year(), 1)?,
            first_of_month(date.year().checked_add(1)?, 1)?,
        ),
        CalendarUnit::MultiYear { span } => {
            let span = i32::try_from(span.get()).ok()?;
            let base = date.year().div_euclid(span) * span;
            (
                first_of_month(base, 1)?,
                first_of_month(base.checked_add(span)?, 1)?,
            )
        }
    };

    Some(Bounds::new(midnight(start)?, midnight(end)?))
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn midnight(date: NaiveDate) -> Option<i64> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .unwrap()
            .timestamp()
    }

    fn midnight_of(year: i32, month: u32, day: u32) -> i64 {
        ts(year, month, day, 0, 0, 0)
    }

    fn duration(seconds: u32) -> TimeframeRule {
        TimeframeRule::Duration {
            seconds: NonZeroU32::new(seconds).unwrap(),
        }
    }

    fn multi_year(span: u32) -> TimeframeRule {
        TimeframeRule::Calendar(CalendarUnit::MultiYear {
            span: NonZeroU32::new(span).unwrap(),
        })
    }

    #[test]
    fn test_duration_grid_alignment() {
        for size in [1, 2, 5, 10, 12, 30, 60, 300, 900, 3600] {
            let rule = duration(size);
            for t in [0, 1, 59, 61, 1_700_000_007, 1_700_000_013, -1, -3601] {
                let bounds = resolve_bounds(t, &rule).unwrap();
                assert_eq!(bounds.start.rem_euclid(i64::from(size)), 0);
                assert_eq!(bounds.span(), i64::from(size));
                assert!(bounds.contains(t));
            }
        }
    }

    #[test]
    fn test_duration_same_and_next_bucket() {
        let rule = duration(60);
        let base = ts(2024, 3, 10, 14, 5, 0);

        let first = resolve_bounds(base + 3, &rule).unwrap();
        let second = resolve_bounds(base + 59, &rule).unwrap();
        let next = resolve_bounds(base + 60, &rule).unwrap();

        assert_eq!(first, second);
        assert_eq!(next.start - first.start, 60);
    }

    #[test]
    fn test_duration_boundary_is_left_inclusive() {
        let rule = duration(12);
        let bounds = resolve_bounds(120, &rule).unwrap();
        assert_eq!(bounds, Bounds::new(120, 132));
        assert_eq!(resolve_bounds(119, &rule).unwrap(), Bounds::new(108, 120));
    }

    #[test]
    fn test_duration_negative_timestamp() {
        assert_eq!(resolve_bounds(-1, &duration(60)).unwrap(), Bounds::new(-60, 0));
    }

    #[test]
    fn test_duration_overflow() {
        assert!(resolve_bounds(i64::MAX, &duration(7)).is_none());
    }

    #[test]
    fn test_day() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Day);
        let bounds = resolve_bounds(ts(2024, 2, 29, 23, 59, 59), &rule).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(2024, 2, 29), midnight_of(2024, 3, 1)));
    }

    #[test]
    fn test_week_starts_monday() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Week);
        // 2024-01-03 is a Wednesday.
        let bounds = resolve_bounds(ts(2024, 1, 3, 9, 30, 0), &rule).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(2024, 1, 1), midnight_of(2024, 1, 8)));

        // Sunday belongs to the week that started the previous Monday.
        let sunday = resolve_bounds(ts(2024, 1, 7, 23, 0, 0), &rule).unwrap();
        assert_eq!(sunday, bounds);

        // A week may straddle a year boundary.
        let straddle = resolve_bounds(ts(2025, 1, 1, 0, 0, 0), &rule).unwrap();
        assert_eq!(
            straddle,
            Bounds::new(midnight_of(2024, 12, 30), midnight_of(2025, 1, 6))
        );
    }

    #[test]
    fn test_month() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Month);
        let bounds = resolve_bounds(ts(2024, 2, 15, 12, 0, 0), &rule).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(2024, 2, 1), midnight_of(2024, 3, 1)));
        assert_eq!(bounds.span(), 29 * 86_400);
    }

    #[test]
    fn test_month_december_rollover() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Month);
        let bounds = resolve_bounds(ts(2024, 12, 20, 0, 0, 0), &rule).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(2024, 12, 1), midnight_of(2025, 1, 1)));
    }

    #[test]
    fn test_quarter() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Quarter);
        let q3 = resolve_bounds(ts(2024, 7, 1, 0, 0, 0), &rule).unwrap();
        assert_eq!(q3, Bounds::new(midnight_of(2024, 7, 1), midnight_of(2024, 10, 1)));

        let q1 = resolve_bounds(ts(2024, 3, 31, 23, 59, 59), &rule).unwrap();
        assert_eq!(q1, Bounds::new(midnight_of(2024, 1, 1), midnight_of(2024, 4, 1)));

        let q4 = resolve_bounds(ts(2023, 11, 5, 8, 0, 0), &rule).unwrap();
        assert_eq!(q4, Bounds::new(midnight_of(2023, 10, 1), midnight_of(2024, 1, 1)));
    }

    #[test]
    fn test_year() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Year);
        let bounds = resolve_bounds(ts(2024, 6, 1, 0, 0, 0), &rule).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(2024, 1, 1), midnight_of(2025, 1, 1)));
        assert_eq!(bounds.span(), 366 * 86_400);
    }

    #[test]
    fn test_multi_year() {
        let bounds = resolve_bounds(ts(2023, 8, 14, 0, 0, 0), &multi_year(5)).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(2020, 1, 1), midnight_of(2025, 1, 1)));

        let decade = resolve_bounds(ts(2030, 1, 1, 0, 0, 0), &multi_year(10)).unwrap();
        assert_eq!(decade, Bounds::new(midnight_of(2030, 1, 1), midnight_of(2040, 1, 1)));

        let biennial = resolve_bounds(ts(2025, 12, 31, 23, 59, 59), &multi_year(2)).unwrap();
        assert_eq!(biennial, Bounds::new(midnight_of(2024, 1, 1), midnight_of(2026, 1, 1)));
    }

    #[test]
    fn test_calendar_before_epoch() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Month);
        let bounds = resolve_bounds(-1, &rule).unwrap();
        assert_eq!(bounds, Bounds::new(midnight_of(1969, 12, 1), 0));
    }

    #[test]
    fn test_calendar_out_of_range() {
        let rule = TimeframeRule::Calendar(CalendarUnit::Day);
        assert!(resolve_bounds(i64::MAX, &rule).is_none());
        assert!(resolve_bounds(i64::MIN, &rule).is_none());
    }
}
