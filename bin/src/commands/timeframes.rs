//! Timeframes command implementation.
//!
//! Lists the timeframes the engine was built with, in configuration order.

use anyhow::Result;
use candlewick_lib::prelude::*;

/// Print the configured timeframes as a table.
pub(crate) fn list_timeframes(engine: &SyntheticEngine) -> Result<()> {
    let timeframes = engine.timeframes();

    println!("{:<10} {:<10} {:<20}", "NAME", "KIND", "RULE");
    println!("{}", "-".repeat(42));

    for timeframe in timeframes {
        let kind = if timeframe.rule().is_calendar() {
            "calendar"
        } else {
            "duration"
        };
        println!(
            "{:<10} {:<10} {:<20}",
            timeframe.name(),
            kind,
            timeframe.rule()
        );
    }

    println!("\nTotal: {} timeframes", timeframes.len());
    Ok(())
}
