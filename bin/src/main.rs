//! candlewick CLI - live multi-timeframe candles from trade ticks.

use anyhow::Result;
use candlewick_lib::{InputFormat, OutputFormat};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "candlewick")]
#[command(about = "Live multi-timeframe OHLCV candles from trade ticks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only log errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Timeframe configuration file (JSON). Defaults to the reference set.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay ticks into the engine and print the resulting candles
    Replay {
        /// Input file. Defaults to stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Input line format (auto, ndjson, trade, csv)
        #[arg(long, default_value = "auto")]
        input_format: InputFormat,

        /// Only print these symbols (repeatable). Defaults to every symbol seen.
        #[arg(short, long)]
        symbol: Vec<String>,

        /// Comma-separated timeframe names to print. Defaults to all.
        #[arg(short, long)]
        timeframes: Option<String>,

        /// Query time as epoch seconds or RFC 3339. Defaults to now.
        #[arg(long)]
        now: Option<String>,

        /// Output format (json, ndjson, csv, tsv)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Also print the grid every N seconds while ingesting
        #[arg(short, long)]
        watch: Option<u64>,
    },

    /// List configured timeframes
    Timeframes,

    /// Show the bucket a timestamp falls into for each timeframe
    Resolve {
        /// Timestamp as epoch seconds or RFC 3339
        timestamp: String,

        /// Only resolve this timeframe
        #[arg(short, long)]
        timeframe: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    display::init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let engine = display::load_engine(cli.config.as_deref())?;

    match command {
        Commands::Replay {
            input,
            input_format,
            symbol,
            timeframes,
            now,
            format,
            pretty,
            watch,
        } => {
            let options = commands::replay::ReplayOptions {
                input,
                input_format,
                symbols: symbol,
                timeframes: timeframes.as_deref().map(display::parse_timeframe_list),
                now: now.as_deref().map(display::parse_timestamp).transpose()?,
                format,
                pretty,
                watch,
            };
            commands::replay::replay(engine, options).await
        }
        Commands::Timeframes => commands::timeframes::list_timeframes(&engine),
        Commands::Resolve {
            timestamp,
            timeframe,
        } => commands::resolve::resolve(
            &engine,
            display::parse_timestamp(&timestamp)?,
            timeframe.as_deref(),
        ),
    }
}
