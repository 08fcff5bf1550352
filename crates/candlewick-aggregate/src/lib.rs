//! Bucket resolution and OHLCV bars for the candlewick synthetic candle engine.
//!
//! This crate provides the pure building blocks of live candle synthesis:
//!
//! - [`resolve_bounds`] - Maps a timestamp to its `[start, end)` bucket
//! - [`Bar`] - OHLCV aggregate for one open window
//! - [`BarView`] - Point-in-time snapshot of a bar

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod bucket;

pub use bar::{Bar, BarView, format_iso_seconds};
pub use bucket::{Bounds, resolve_bounds};
