//! Batch downloader — partitions the ticker list, requests each batch, and
//! assembles the combined output table.
//!
//! Failure policy is skip-and-continue: a faulted or empty batch is logged
//! and omitted, and the run carries on. Only the final CSV write (and, one
//! level up, the page fetch) propagates an error.

use super::provider::{DataError, PriceProvider, Progress};
use super::scrape;
use super::table::PriceTable;
use super::yahoo::YahooProvider;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Tickers per provider request. Keeps each request under the provider's
/// practical request-size limit.
pub const BATCH_SIZE: usize = 10;

pub const DEFAULT_START: &str = "2020-01-01";
pub const DEFAULT_END: &str = "2026-01-01";
pub const DEFAULT_OUTPUT: &str = "ftse100_database.csv";

/// How a run ended. None of these are process errors: a run that scraped
/// nothing or downloaded nothing terminates normally, with diagnostics as
/// the only signal.
#[derive(Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The scrape produced no tickers; nothing was requested or written.
    NoTickers,
    /// Every batch faulted or came back empty; nothing was written.
    NoData {
        batches_failed: usize,
        batches_empty: usize,
    },
    /// The combined table was written.
    Written {
        path: PathBuf,
        tickers: usize,
        batches_failed: usize,
        batches_empty: usize,
    },
}

/// Download price history for `tickers` in fixed-size batches and write the
/// column-wise concatenation of the successful batches to `output`.
///
/// Exactly `ceil(tickers.len() / BATCH_SIZE)` provider requests are made, in
/// list order. An empty ticker list short-circuits: zero requests, no file.
pub fn build_database(
    provider: &dyn PriceProvider,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
    output: &Path,
    progress: &dyn Progress,
) -> Result<DownloadOutcome, DataError> {
    if tickers.is_empty() {
        progress.on_no_tickers();
        return Ok(DownloadOutcome::NoTickers);
    }

    progress.on_download_start(tickers.len(), start, end);

    let total = tickers.len().div_ceil(BATCH_SIZE);
    let mut accumulated: Vec<PriceTable> = Vec::new();
    let mut batches_failed = 0;
    let mut batches_empty = 0;

    for (i, batch) in tickers.chunks(BATCH_SIZE).enumerate() {
        let index = i + 1;
        progress.on_batch_start(index, total, batch);

        match provider.fetch_batch(batch, start, end) {
            Err(e) => {
                progress.on_batch_error(index, batch, &e);
                batches_failed += 1;
            }
            Ok(table) if table.is_empty() => {
                progress.on_batch_empty(index, batch);
                batches_empty += 1;
            }
            Ok(table) => accumulated.push(table),
        }
    }

    if accumulated.is_empty() {
        progress.on_nothing_downloaded();
        return Ok(DownloadOutcome::NoData {
            batches_failed,
            batches_empty,
        });
    }

    let mut combined = PriceTable::new();
    for table in accumulated {
        combined.merge(table);
    }
    combined.write_csv(output)?;
    progress.on_written(output);

    Ok(DownloadOutcome::Written {
        path: output.to_path_buf(),
        tickers: combined.tickers().len(),
        batches_failed,
        batches_empty,
    })
}

/// Full scrape-then-download-then-write flow against Yahoo Finance.
pub fn run(
    start: NaiveDate,
    end: NaiveDate,
    output: &Path,
    progress: &dyn Progress,
) -> Result<DownloadOutcome, DataError> {
    let tickers = scrape::scrape_tickers()?;
    let provider = YahooProvider::new();
    build_database(&provider, &tickers, start, end, output, progress)
}
