//! Display utilities and shared setup for the candlewick CLI.

use anyhow::{Context, Result, bail};
use candlewick_lib::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v`/`--quiet`.
pub(crate) fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the engine from a config file, or the reference set when absent.
pub(crate) fn load_engine(config: Option<&Path>) -> Result<SyntheticEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::reference(),
    };
    SyntheticEngine::from_config(&config).context("Invalid timeframe configuration")
}

/// Parse a timestamp given as epoch seconds or RFC 3339.
pub(crate) fn parse_timestamp(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(seconds) = s.parse::<i64>() {
        return Ok(seconds);
    }
    match chrono::DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.timestamp()),
        Err(_) => bail!("Invalid timestamp: {s}. Use epoch seconds or RFC 3339"),
    }
}

/// Split a comma-separated list of timeframe names.
pub(crate) fn parse_timeframe_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write candle records to stdout in the specified format.
pub(crate) fn write_candles(
    candles: &[CandleRecord],
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    let mut writer = std::io::stdout();

    match format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new().with_pretty(pretty);
            formatter.write_candles(candles, &mut writer)?;
        }
        OutputFormat::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_candles(candles, &mut writer)?;
        }
        OutputFormat::Csv => {
            let formatter = CsvFormatter::new();
            formatter.write_candles(candles, &mut writer)?;
        }
        OutputFormat::Tsv => {
            let formatter = CsvFormatter::tsv();
            formatter.write_candles(candles, &mut writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1704110400").unwrap(), 1_704_110_400);
        assert_eq!(parse_timestamp("-60").unwrap(), -60);
        assert_eq!(
            parse_timestamp("2024-01-01T12:00:00Z").unwrap(),
            1_704_110_400
        );
        assert_eq!(
            parse_timestamp("2024-01-01T13:00:00+01:00").unwrap(),
            1_704_110_400
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_timeframe_list() {
        assert_eq!(parse_timeframe_list("1m, 5m,,day "), ["1m", "5m", "day"]);
        assert!(parse_timeframe_list(" , ").is_empty());
    }
}
