//! Trade tick representation.

use serde::{Deserialize, Serialize};

use crate::TickError;

/// A single observed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol as delivered by the feed (e.g. `AAPL`, `BINANCE:BTCUSDT`).
    pub symbol: String,
    /// Trade price.
    pub price: f64,
    /// Traded volume. Absent volume is treated as zero.
    #[serde(default)]
    pub volume: f64,
    /// Trade time in epoch seconds (UTC).
    pub timestamp: i64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(symbol: impl Into<String>, price: f64, volume: f64, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            volume,
            timestamp,
        }
    }
}

/// Checks that a trade's price and volume can be folded into a bar.
///
/// # Errors
///
/// Returns an error if the price is not finite, or the volume is negative
/// or not finite.
pub fn validate_trade(symbol: &str, price: f64, volume: f64) -> Result<(), TickError> {
    if !price.is_finite() {
        return Err(TickError::NonFinitePrice {
            symbol: symbol.to_string(),
            price,
        });
    }
    if !volume.is_finite() || volume < 0.0 {
        return Err(TickError::InvalidVolume {
            symbol: symbol.to_string(),
            volume,
        });
    }
    Ok(())
}
