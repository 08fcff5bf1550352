//! Replay command implementation.
//!
//! Streams tick lines from a file or stdin into the engine, then prints the
//! candle grid for the selected symbols and timeframes.

use crate::display::write_candles;
use anyhow::{Context, Result};
use candlewick_lib::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Options for a replay run.
pub(crate) struct ReplayOptions {
    pub(crate) input: Option<PathBuf>,
    pub(crate) input_format: InputFormat,
    pub(crate) symbols: Vec<String>,
    pub(crate) timeframes: Option<Vec<String>>,
    pub(crate) now: Option<i64>,
    pub(crate) format: OutputFormat,
    pub(crate) pretty: bool,
    pub(crate) watch: Option<u64>,
}

/// Line counters for one replay run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReplayStats {
    pub(crate) lines: u64,
    pub(crate) accepted: u64,
    pub(crate) rejected: u64,
    pub(crate) malformed: u64,
}

/// Which part of the grid to print.
#[derive(Debug, Clone, Default)]
pub(crate) struct GridSelection {
    symbols: Vec<String>,
    timeframes: Option<Vec<String>>,
}

impl GridSelection {
    pub(crate) const fn new(symbols: Vec<String>, timeframes: Option<Vec<String>>) -> Self {
        Self {
            symbols,
            timeframes,
        }
    }

    /// Collects records in symbol order, then configured timeframe order.
    pub(crate) fn records(&self, engine: &SyntheticEngine, now: i64) -> Vec<CandleRecord> {
        let symbols = if self.symbols.is_empty() {
            engine.symbols()
        } else {
            self.symbols.clone()
        };

        let mut records = Vec::new();
        for symbol in &symbols {
            let mut grid = match &self.timeframes {
                Some(names) => engine.get_candles_at(symbol, names.as_slice(), now),
                None => engine.get_all_candles_at(symbol, now),
            };
            for timeframe in engine.timeframes() {
                if let Some(view) = grid.remove(timeframe.name()) {
                    records.push(CandleRecord::new(symbol.as_str(), timeframe.name(), view));
                }
            }
        }
        records
    }
}

/// Replay ticks into `engine` and print the resulting candles.
pub(crate) async fn replay(engine: SyntheticEngine, options: ReplayOptions) -> Result<()> {
    if let Some(names) = &options.timeframes {
        for name in names.iter().filter(|name| engine.timeframe(name).is_none()) {
            tracing::warn!(timeframe = %name, "ignoring unknown timeframe");
        }
    }

    let engine = Arc::new(engine);
    let selection = GridSelection::new(options.symbols, options.timeframes);
    let decoder = LineDecoder::new(options.input_format);

    let watcher = options.watch.map(|seconds| {
        tokio::spawn(watch(
            Arc::clone(&engine),
            selection.clone(),
            options.format,
            options.pretty,
            seconds.max(1),
        ))
    });

    let stats = match &options.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            ingest_lines(&engine, &decoder, BufReader::new(file)).await
        }
        None => ingest_lines(&engine, &decoder, BufReader::new(tokio::io::stdin())).await,
    };

    if let Some(handle) = watcher {
        handle.abort();
    }
    let stats = stats?;

    tracing::info!(
        lines = stats.lines,
        accepted = stats.accepted,
        rejected = stats.rejected,
        malformed = stats.malformed,
        symbols = engine.len(),
        format = %options.format,
        "replay finished"
    );

    let now = options.now.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let records = selection.records(&engine, now);
    write_candles(&records, options.format, options.pretty)
}

/// Decode every line of `reader` and feed the ticks into `engine`.
///
/// Malformed lines and rejected ticks are logged and skipped.
pub(crate) async fn ingest_lines<R>(
    engine: &SyntheticEngine,
    decoder: &LineDecoder,
    reader: R,
) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        stats.lines += 1;
        let ticks = match decoder.decode(&line) {
            Ok(ticks) => ticks,
            Err(e) => {
                stats.malformed += 1;
                tracing::warn!(line = stats.lines, error = %e, "skipping malformed line");
                continue;
            }
        };
        for tick in &ticks {
            match engine.ingest(tick) {
                Ok(()) => stats.accepted += 1,
                Err(e) => {
                    stats.rejected += 1;
                    tracing::warn!(line = stats.lines, error = %e, "rejected tick");
                }
            }
        }
    }

    Ok(stats)
}

async fn watch(
    engine: Arc<SyntheticEngine>,
    selection: GridSelection,
    format: OutputFormat,
    pretty: bool,
    seconds: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(seconds));
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let records = selection.records(&engine, chrono::Utc::now().timestamp());
        if let Err(e) = write_candles(&records, format, pretty) {
            tracing::error!(error = %e, "failed to print candles");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SyntheticEngine {
        SyntheticEngine::new(vec![
            Timeframe::duration("5s", 5).unwrap(),
            Timeframe::duration("1m", 60).unwrap(),
            Timeframe::calendar("day", CalendarUnit::Day).unwrap(),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_lines_counts() {
        let engine = engine();
        let input = concat!(
            r#"{"symbol":"AAPL","price":10.0,"volume":1,"timestamp":1704110400}"#,
            "\n",
            "not json\n",
            r#"{"symbol":"AAPL","price":-1.0,"volume":-5,"timestamp":1704110401}"#,
            "\n",
            "\n",
            r#"{"type":"trade","data":[{"s":"MSFT","p":20.0,"v":2,"t":1704110402000},{"s":"AAPL","p":11.0,"v":1,"t":1704110403999}]}"#,
            "\n",
        );

        let decoder = LineDecoder::new(InputFormat::Auto);
        let stats = ingest_lines(&engine, &decoder, input.as_bytes())
            .await
            .unwrap();

        assert_eq!(stats.lines, 5);
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.malformed, 1);

        let bar = engine.get_candle_at("AAPL", "5s", 1_704_110_404).unwrap();
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.close, 11.0);
        assert_eq!(bar.volume, 2.0);
        assert_eq!(engine.symbols(), ["AAPL", "MSFT"]);
    }

    #[test]
    fn test_selection_order_and_filter() {
        let engine = engine();
        engine.ingest_tick("MSFT", 20.0, 1.0, 1_704_110_400).unwrap();
        engine.ingest_tick("AAPL", 10.0, 1.0, 1_704_110_400).unwrap();

        let all = GridSelection::default().records(&engine, 1_704_110_401);
        let keys: Vec<_> = all
            .iter()
            .map(|r| (r.symbol.as_str(), r.timeframe.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("AAPL", "5s"),
                ("AAPL", "1m"),
                ("AAPL", "day"),
                ("MSFT", "5s"),
                ("MSFT", "1m"),
                ("MSFT", "day"),
            ]
        );

        let some = GridSelection::new(
            vec!["MSFT".to_string(), "NVDA".to_string()],
            Some(vec!["day".to_string(), "bogus".to_string(), "5s".to_string()]),
        )
        .records(&engine, 1_704_110_401);
        let keys: Vec<_> = some
            .iter()
            .map(|r| (r.symbol.as_str(), r.timeframe.as_str()))
            .collect();
        assert_eq!(keys, [("MSFT", "5s"), ("MSFT", "day")]);
    }
}
