//! Resolve command implementation.
//!
//! Shows which bucket a timestamp lands in for each configured timeframe.

use anyhow::{Context, Result};
use candlewick_lib::format_iso_seconds;
use candlewick_lib::prelude::*;

/// Print the bucket containing `timestamp` for one or all timeframes.
pub(crate) fn resolve(engine: &SyntheticEngine, timestamp: i64, only: Option<&str>) -> Result<()> {
    let timeframes: Vec<&Timeframe> = match only {
        Some(name) => vec![
            engine
                .timeframe(name)
                .with_context(|| format!("Unknown timeframe: {name}"))?,
        ],
        None => engine.timeframes().iter().collect(),
    };

    let at = format_iso_seconds(timestamp)
        .with_context(|| format!("Timestamp out of range: {timestamp}"))?;
    println!("Timestamp: {timestamp} ({at})\n");

    println!(
        "{:<10} {:<22} {:<22} {:>12}",
        "NAME", "START", "END", "SPAN (s)"
    );
    println!("{}", "-".repeat(69));

    for timeframe in timeframes {
        match resolve_bounds(timestamp, timeframe.rule()) {
            Some(bounds) => println!(
                "{:<10} {:<22} {:<22} {:>12}",
                timeframe.name(),
                iso_or_raw(bounds.start),
                iso_or_raw(bounds.end),
                bounds.span()
            ),
            None => println!("{:<10} out of range", timeframe.name()),
        }
    }

    Ok(())
}

fn iso_or_raw(timestamp: i64) -> String {
    format_iso_seconds(timestamp).unwrap_or_else(|| timestamp.to_string())
}
