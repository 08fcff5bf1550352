//! Live OHLCV bar and its point-in-time view.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::Bounds;

/// The OHLCV aggregate for one open window.
///
/// Created from the first tick that lands in a window and updated in place by
/// every later tick in the same window. `low <= open, close <= high` holds
/// after every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    bounds: Bounds,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    /// Creates a bar seeded by a single trade.
    #[must_use]
    pub const fn new(bounds: Bounds, price: f64, volume: f64) -> Self {
        Self {
            bounds,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    /// Folds a trade into the bar.
    pub fn update(&mut self, price: f64, volume: f64) {
        self.close = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.volume += volume;
    }

    /// Returns the window this bar covers.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Opening price (first trade in the window).
    #[must_use]
    pub const fn open(&self) -> f64 {
        self.open
    }

    /// Highest price so far.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Lowest price so far.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Latest price.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    /// Accumulated volume.
    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// Returns a view of the bar as seen at `now` (epoch seconds).
    ///
    /// Timing fields depend on the query time rather than the last trade, so a
    /// bar reports `complete` once its window has passed even if no further
    /// tick has arrived.
    #[must_use]
    pub fn snapshot(&self, now: i64) -> BarView {
        let Bounds { start, end } = self.bounds;
        let elapsed = now.saturating_sub(start).max(0);
        let total = end.saturating_sub(start).max(1);
        let remaining = total.saturating_sub(elapsed).max(0);

        BarView {
            start,
            end,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            elapsed,
            remaining,
            complete: now >= end,
        }
    }
}

/// Point-in-time view of a [`Bar`].
///
/// Serializes to the compact wire shape
/// `{"t","o","h","l","c","v","elapsed","remaining","complete"}` where `t` is
/// the window start as `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarView {
    /// Window start (epoch seconds).
    #[serde(rename = "t", serialize_with = "serialize_iso")]
    pub start: i64,
    /// Window end (epoch seconds, exclusive).
    #[serde(skip)]
    pub end: i64,
    /// Opening price.
    #[serde(rename = "o")]
    pub open: f64,
    /// Highest price.
    #[serde(rename = "h")]
    pub high: f64,
    /// Lowest price.
    #[serde(rename = "l")]
    pub low: f64,
    /// Latest price.
    #[serde(rename = "c")]
    pub close: f64,
    /// Accumulated volume.
    #[serde(rename = "v")]
    pub volume: f64,
    /// Seconds since the window opened, never negative.
    pub elapsed: i64,
    /// Seconds until the window closes, never negative.
    pub remaining: i64,
    /// True once the query time has reached the window end.
    pub complete: bool,
}

impl BarView {
    /// Returns the window start formatted as `YYYY-MM-DDTHH:MM:SSZ`.
    #[must_use]
    pub fn start_iso(&self) -> Option<String> {
        format_iso_seconds(self.start)
    }
}

/// Formats epoch seconds as ISO-8601 UTC with second precision and a `Z` suffix.
#[must_use]
pub fn format_iso_seconds(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

fn serialize_iso<S: Serializer>(timestamp: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    match format_iso_seconds(*timestamp) {
        Some(iso) => serializer.serialize_str(&iso),
        None => Err(serde::ser::Error::custom(format!(
            "timestamp {timestamp} is out of range"
        ))),
    }
}
