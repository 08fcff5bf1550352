//! CLI command implementations.

pub(crate) mod replay;
pub(crate) mod resolve;
pub(crate) mod timeframes;
