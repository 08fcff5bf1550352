//! Core types for the candlewick synthetic candle engine.
//!
//! This crate provides the fundamental data structures used throughout candlewick:
//!
//! - [`Tick`] - A single trade with symbol, price, volume and timestamp
//! - [`Timeframe`] - A named bucketing rule
//! - [`TimeframeRule`] - Duration or calendar bucketing
//! - [`CalendarUnit`] - Calendar units from day to multi-year
//! - [`ConfigError`] / [`TickError`] - Configuration and per-tick failures

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod tick;
mod timeframe;

pub use error::{CandlewickError, ConfigError, Result, TickError};
pub use tick::{Tick, validate_trade};
pub use timeframe::{CalendarUnit, MAX_YEARS_SPAN, Timeframe, TimeframeRule};
