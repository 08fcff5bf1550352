//! Benchmark utilities for candlewick.
//!
//! Provides a deterministic synthetic tick stream so benchmark runs are
//! comparable across machines and commits.

use candlewick_types::Tick;

/// Shape of a synthetic tick stream.
#[derive(Debug, Clone)]
pub struct TickStream {
    /// Symbols the stream rotates through.
    pub symbols: Vec<String>,
    /// First tick timestamp (epoch seconds).
    pub start: i64,
    /// Ticks emitted per second of market time.
    pub ticks_per_second: u32,
    /// Seed for the price walk.
    pub seed: u64,
}

impl TickStream {
    /// Creates a stream over `symbol_count` generated symbols.
    pub fn new(symbol_count: usize) -> Self {
        Self {
            symbols: (0..symbol_count).map(|i| format!("SYM{i:04}")).collect(),
            start: 1_704_110_400,
            ticks_per_second: 50,
            seed: 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// Generates `count` ticks with a bounded random-walk price.
    pub fn generate(&self, count: usize) -> Vec<Tick> {
        let mut state = self.seed;
        let mut price = 100.0_f64;
        let per_second = i64::from(self.ticks_per_second.max(1));

        (0..count)
            .map(|i| {
                state = xorshift(state);
                let step = (state % 201) as f64 / 100.0 - 1.0;
                price = (price + step * 0.05).max(1.0);
                let volume = (state >> 32) % 500 + 1;
                let symbol = &self.symbols[i % self.symbols.len().max(1)];
                let timestamp = self.start + i as i64 / per_second;
                Tick::new(symbol.as_str(), price, volume as f64, timestamp)
            })
            .collect()
    }
}

const fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlewick_types::validate_trade;

    #[test]
    fn test_stream_is_deterministic() {
        let stream = TickStream::new(3);
        let a = stream.generate(100);
        let b = stream.generate(100);
        assert_eq!(a, b);
        assert_eq!(a[0].symbol, "SYM0000");
        assert_eq!(a[4].symbol, "SYM0001");
        assert!(
            a.iter()
                .all(|t| validate_trade(&t.symbol, t.price, t.volume).is_ok())
        );
        assert!(a.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
