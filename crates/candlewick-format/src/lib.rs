//! Output formatters for candlewick candle snapshots.
//!
//! This crate provides formatters for writing [`CandleRecord`]s
//! to various output formats:
//!
//! - [`CsvFormatter`] - CSV / TSV format, quoting fields where needed
//! - [`JsonFormatter`] - JSON array or NDJSON format

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

pub use crate::csv::CsvFormatter;
pub use formatter::{CandleRecord, FormatError, Formatter, OutputFormat};
pub use json::JsonFormatter;
