//! Multi-timeframe synthetic candle engine for live tick streams.
//!
//! This crate keeps the current OHLCV bar of many timeframes for many
//! symbols, fed one trade at a time:
//!
//! - [`SyntheticEngine`] - Per-symbol bar state, tick ingestion and queries
//! - [`EngineConfig`] - Ordered timeframe list, loadable from JSON
//! - [`TimeframeConfig`] - File-friendly timeframe description
//! - [`LastTrade`] - Latest accepted trade per symbol
//!
//! # Example
//!
//! ```
//! use candlewick_engine::SyntheticEngine;
//!
//! let engine = SyntheticEngine::reference().unwrap();
//! engine.ingest_tick("AAPL", 189.5, 12.0, 1_704_110_400).unwrap();
//!
//! let bar = engine.get_candle_at("AAPL", "1m", 1_704_110_430).unwrap();
//! assert_eq!(bar.elapsed, 30);
//! assert!(!bar.complete);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;

pub use config::{EngineConfig, TimeframeConfig, TimeframeKind};
pub use engine::{LastTrade, SyntheticEngine};
