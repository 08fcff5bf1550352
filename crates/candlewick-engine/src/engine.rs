//! The synthetic multi-timeframe candle engine.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use candlewick_aggregate::{Bar, BarView, Bounds, resolve_bounds};
use candlewick_types::{ConfigError, Tick, TickError, Timeframe, validate_trade};
use chrono::Utc;
use serde::Serialize;

use crate::EngineConfig;
use crate::config::ensure_unique_names;

/// Latest accepted trade for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastTrade {
    /// Symbol the trade belongs to.
    pub symbol: String,
    /// Trade price.
    pub price: f64,
    /// Trade time (epoch seconds).
    pub timestamp: i64,
}

/// Per-symbol state: one bar slot per configured timeframe, by index.
#[derive(Debug)]
struct SymbolBars {
    bars: Vec<Option<Bar>>,
    last_trade: Option<LastTrade>,
}

impl SymbolBars {
    fn new(timeframes: usize) -> Self {
        Self {
            bars: vec![None; timeframes],
            last_trade: None,
        }
    }
}

type SymbolSlot = Arc<RwLock<SymbolBars>>;

/// Maintains the current bar of every configured timeframe for every symbol.
///
/// Ticks are folded in with [`ingest_tick`](Self::ingest_tick). A tick whose
/// bucket differs from the stored bar replaces it; there is no timer-driven
/// rollover and no history. Queries return [`BarView`] snapshots.
///
/// State is sharded per symbol: the symbol table lock is held only to find or
/// create a symbol's slot, and each slot has its own lock covering all of its
/// timeframes. A tick for one symbol therefore never blocks another symbol,
/// and readers see a symbol either entirely before or entirely after a tick.
///
/// Out-of-order ticks are bucketed by their own timestamp. A late tick can
/// open an earlier bucket, after which further ticks for the newer bucket
/// start a fresh bar; nothing is merged back.
#[derive(Debug)]
pub struct SyntheticEngine {
    timeframes: Vec<Timeframe>,
    index: HashMap<String, usize>,
    symbols: RwLock<HashMap<String, SymbolSlot>>,
}

impl SyntheticEngine {
    /// Creates an engine maintaining `timeframes`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if two timeframes share a name.
    pub fn new(timeframes: Vec<Timeframe>) -> Result<Self, ConfigError> {
        ensure_unique_names(&timeframes)?;
        let index = timeframes
            .iter()
            .enumerate()
            .map(|(i, tf)| (tf.name().to_string(), i))
            .collect();

        tracing::info!(
            timeframes = timeframes.len(),
            names = %timeframes.iter().map(Timeframe::name).collect::<Vec<_>>().join(","),
            "synthetic engine ready"
        );

        Ok(Self {
            timeframes,
            index,
            symbols: RwLock::new(HashMap::new()),
        })
    }

    /// Creates an engine from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured timeframe is invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config.build_timeframes()?)
    }

    /// Creates an engine with the reference timeframe set.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in set; the result mirrors [`Self::from_config`].
    pub fn reference() -> Result<Self, ConfigError> {
        Self::from_config(&EngineConfig::reference())
    }

    /// Returns the configured timeframes in order.
    #[must_use]
    pub fn timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }

    /// Looks up a configured timeframe by name.
    #[must_use]
    pub fn timeframe(&self, name: &str) -> Option<&Timeframe> {
        self.index.get(name).map(|&i| &self.timeframes[i])
    }

    /// Folds a trade into every timeframe of `symbol`.
    ///
    /// Validation and bucket resolution happen before any state is touched,
    /// so a rejected tick leaves every bar unchanged. With no timeframes
    /// configured an accepted tick is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not finite, the volume is negative
    /// or not finite, or the timestamp cannot be bucketed by some timeframe.
    pub fn ingest_tick(
        &self,
        symbol: &str,
        price: f64,
        volume: f64,
        timestamp: i64,
    ) -> Result<(), TickError> {
        let result = self.try_ingest(symbol, price, volume, timestamp);
        if let Err(e) = &result {
            tracing::debug!(symbol, timestamp, error = %e, "rejected tick");
        }
        result
    }

    /// Folds a [`Tick`] into every timeframe of its symbol.
    ///
    /// # Errors
    ///
    /// See [`Self::ingest_tick`].
    pub fn ingest(&self, tick: &Tick) -> Result<(), TickError> {
        self.ingest_tick(&tick.symbol, tick.price, tick.volume, tick.timestamp)
    }

    fn try_ingest(
        &self,
        symbol: &str,
        price: f64,
        volume: f64,
        timestamp: i64,
    ) -> Result<(), TickError> {
        validate_trade(symbol, price, volume)?;
        if self.timeframes.is_empty() {
            return Ok(());
        }

        let bounds = self
            .timeframes
            .iter()
            .map(|tf| resolve_bounds(timestamp, tf.rule()))
            .collect::<Option<Vec<Bounds>>>()
            .ok_or_else(|| TickError::TimestampOutOfRange {
                symbol: symbol.to_string(),
                timestamp,
            })?;

        let slot = self.slot_or_insert(symbol);
        let mut state = write(&slot);

        for ((tf, bar), bounds) in self.timeframes.iter().zip(&mut state.bars).zip(bounds) {
            match bar {
                Some(current) if current.bounds() == bounds => {
                    current.update(price, volume);
                    tracing::trace!(symbol, timeframe = tf.name(), price, "bar updated");
                }
                _ => {
                    tracing::debug!(
                        symbol,
                        timeframe = tf.name(),
                        start = bounds.start,
                        end = bounds.end,
                        "bar opened"
                    );
                    *bar = Some(Bar::new(bounds, price, volume));
                }
            }
        }

        state.last_trade = Some(LastTrade {
            symbol: symbol.to_string(),
            price,
            timestamp,
        });
        Ok(())
    }

    /// Returns the current bar of `timeframe` for `symbol` at wall-clock time.
    ///
    /// Returns `None` if the symbol has never been ticked, the timeframe has
    /// no bar yet, or the timeframe is not configured.
    #[must_use]
    pub fn get_candle(&self, symbol: &str, timeframe: &str) -> Option<BarView> {
        self.get_candle_at(symbol, timeframe, now())
    }

    /// Returns the current bar of `timeframe` for `symbol` as seen at `now`.
    #[must_use]
    pub fn get_candle_at(&self, symbol: &str, timeframe: &str, now: i64) -> Option<BarView> {
        let &i = self.index.get(timeframe)?;
        let slot = self.slot(symbol)?;
        let state = read(&slot);
        state.bars[i].map(|bar| bar.snapshot(now))
    }

    /// Returns every timeframe's current bar for `symbol` at wall-clock time.
    ///
    /// Timeframes without a bar are omitted.
    #[must_use]
    pub fn get_all_candles(&self, symbol: &str) -> BTreeMap<String, BarView> {
        self.get_all_candles_at(symbol, now())
    }

    /// Returns every timeframe's current bar for `symbol` as seen at `now`.
    #[must_use]
    pub fn get_all_candles_at(&self, symbol: &str, now: i64) -> BTreeMap<String, BarView> {
        let Some(slot) = self.slot(symbol) else {
            return BTreeMap::new();
        };
        let state = read(&slot);
        self.timeframes
            .iter()
            .zip(&state.bars)
            .filter_map(|(tf, bar)| bar.map(|b| (tf.name().to_string(), b.snapshot(now))))
            .collect()
    }

    /// Returns the current bars of the requested timeframes at wall-clock time.
    ///
    /// Unknown names and timeframes without a bar are omitted.
    #[must_use]
    pub fn get_candles<S: AsRef<str>>(
        &self,
        symbol: &str,
        timeframes: &[S],
    ) -> BTreeMap<String, BarView> {
        self.get_candles_at(symbol, timeframes, now())
    }

    /// Returns the current bars of the requested timeframes as seen at `now`.
    ///
    /// All requested bars come from one consistent view of the symbol.
    #[must_use]
    pub fn get_candles_at<S: AsRef<str>>(
        &self,
        symbol: &str,
        timeframes: &[S],
        now: i64,
    ) -> BTreeMap<String, BarView> {
        let Some(slot) = self.slot(symbol) else {
            return BTreeMap::new();
        };
        let state = read(&slot);
        timeframes
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let &i = self.index.get(name)?;
                state.bars[i].map(|bar| (name.to_string(), bar.snapshot(now)))
            })
            .collect()
    }

    /// Returns the latest accepted trade for `symbol`.
    #[must_use]
    pub fn last_trade(&self, symbol: &str) -> Option<LastTrade> {
        let slot = self.slot(symbol)?;
        let state = read(&slot);
        state.last_trade.clone()
    }

    /// Returns every symbol that has received a tick, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = read(&self.symbols).keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Returns the number of tracked symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.symbols).len()
    }

    /// Returns true if no symbol has been ticked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read(&self.symbols).is_empty()
    }

    fn slot(&self, symbol: &str) -> Option<SymbolSlot> {
        read(&self.symbols).get(symbol).cloned()
    }

    /// Returns the slot for `symbol`, allocating a pre-sized one on first use.
    fn slot_or_insert(&self, symbol: &str) -> SymbolSlot {
        if let Some(slot) = self.slot(symbol) {
            return slot;
        }
        let mut symbols = write(&self.symbols);
        Arc::clone(symbols.entry(symbol.to_string()).or_insert_with(|| {
            tracing::debug!(symbol, "tracking new symbol");
            Arc::new(RwLock::new(SymbolBars::new(self.timeframes.len())))
        }))
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

// Writers never leave a slot half-updated, so a poisoned lock still guards
// consistent data.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
