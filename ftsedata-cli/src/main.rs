//! ftsedata CLI — build a consolidated FTSE 100 daily price database.
//!
//! Running with no arguments scrapes the constituent list from Wikipedia and
//! downloads 2020-01-01..2026-01-01 daily OHLCV history for every ticker into
//! `ftse100_database.csv` in the current directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use ftsedata_core::data::{run, StdoutProgress, DEFAULT_END, DEFAULT_OUTPUT, DEFAULT_START};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ftsedata",
    about = "Scrape FTSE 100 constituents and download their daily price history"
)]
struct Cli {
    /// Start date (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_START)]
    start: String,

    /// End date (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_END)]
    end: String,

    /// Output CSV path. Overwritten if it exists.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let start = NaiveDate::parse_from_str(&cli.start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start date: {}", cli.start))?;
    let end = NaiveDate::parse_from_str(&cli.end, "%Y-%m-%d")
        .with_context(|| format!("invalid --end date: {}", cli.end))?;

    println!("Fetching FTSE 100 tickers...");
    run(start, end, &cli.output, &StdoutProgress).context("database build failed")?;

    Ok(())
}
