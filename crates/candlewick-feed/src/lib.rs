//! Tick feed payload decoding for candlewick.
//!
//! The feed connection itself lives outside this workspace. This crate turns
//! the lines such a connection produces into [`Tick`](candlewick_types::Tick)
//! values ready for the engine:
//!
//! - [`LineDecoder`] - Decodes one line in a chosen [`InputFormat`]
//! - [`decode_trade_frame`] - Exchange trade frames with millisecond timestamps
//! - [`decode_tick`] / [`decode_csv_row`] - Plain tick objects and CSV rows

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod parse;

pub use parse::{
    InputFormat, LineDecoder, ParseError, decode_csv_row, decode_tick, decode_trade_frame,
};
