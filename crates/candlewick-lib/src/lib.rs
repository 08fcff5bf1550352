//! Live multi-timeframe OHLCV candles synthesized from trade ticks.
//!
//! This is a facade crate that re-exports functionality from the candlewick
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use candlewick_lib::prelude::*;
//!
//! let engine = SyntheticEngine::from_config(&EngineConfig::reference()).unwrap();
//!
//! let decoder = LineDecoder::new(InputFormat::Trade);
//! let frame = r#"{"type":"trade","data":[{"s":"AAPL","p":189.5,"v":3,"t":1704110400000}]}"#;
//! for tick in decoder.decode(frame).unwrap() {
//!     engine.ingest(&tick).unwrap();
//! }
//!
//! let grid = engine.get_all_candles_at("AAPL", 1_704_110_405);
//! assert_eq!(grid["5s"].remaining, 0);
//! assert!(grid["5s"].complete);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candlewick_types::*;

// Re-export bucketing and bars
pub use candlewick_aggregate::{Bar, BarView, Bounds, format_iso_seconds, resolve_bounds};

// Re-export the engine
pub use candlewick_engine::{
    EngineConfig, LastTrade, SyntheticEngine, TimeframeConfig, TimeframeKind,
};

// Re-export feed decoding
#[cfg(feature = "feed")]
pub use candlewick_feed::{
    InputFormat, LineDecoder, ParseError, decode_csv_row, decode_tick, decode_trade_frame,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use candlewick_format::{
    CandleRecord, CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat,
};

/// Prelude module for convenient imports.
///
/// ```
/// use candlewick_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candlewick_types::{
        CalendarUnit, CandlewickError, ConfigError, Result, Tick, TickError, Timeframe,
        TimeframeRule,
    };

    pub use candlewick_aggregate::{BarView, Bounds, resolve_bounds};

    pub use candlewick_engine::{EngineConfig, LastTrade, SyntheticEngine, TimeframeConfig};

    #[cfg(feature = "feed")]
    pub use candlewick_feed::{InputFormat, LineDecoder};

    #[cfg(feature = "format")]
    pub use candlewick_format::{
        CandleRecord, CsvFormatter, Formatter, JsonFormatter, OutputFormat,
    };
}
