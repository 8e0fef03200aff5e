//! Data provider trait, structured error types, and progress reporting.
//!
//! The PriceProvider trait abstracts over the price-history source (Yahoo
//! Finance in production, mocks in tests). One `fetch_batch` call is one
//! provider request as far as the download loop is concerned.

use super::table::PriceTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Raw daily OHLCV bar from a data provider. Any field may be absent
/// when the provider returned a partial row for that trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// Structured error types for scraping and download operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status} for {symbol}")]
    ProviderStatus {
        symbol: String,
        status: reqwest::StatusCode,
    },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for price-history providers.
///
/// A batch request either yields a table (possibly structurally empty, when
/// the provider had nothing for any symbol in the batch) or fails as a whole.
/// Symbols the provider does not know are skipped silently within the batch.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV history for a batch of tickers over a date range,
    /// with per-ticker columns grouped together in the result.
    fn fetch_batch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError>;
}

/// Diagnostic callbacks for the download loop. Operator visibility only;
/// nothing downstream parses these.
pub trait Progress: Send {
    /// The scrape yielded no tickers; the run aborts before any download.
    fn on_no_tickers(&self);

    /// Tickers scraped, downloads about to start.
    fn on_download_start(&self, tickers: usize, start: NaiveDate, end: NaiveDate);

    /// About to request one batch. `index` is 1-based.
    fn on_batch_start(&self, index: usize, total: usize, tickers: &[String]);

    /// A batch request faulted; the batch is skipped.
    fn on_batch_error(&self, index: usize, tickers: &[String], error: &DataError);

    /// A batch request succeeded but returned no rows; the batch is skipped.
    fn on_batch_empty(&self, index: usize, tickers: &[String]);

    /// The combined table was written.
    fn on_written(&self, path: &Path);

    /// Every batch was skipped; no file was written.
    fn on_nothing_downloaded(&self);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl Progress for StdoutProgress {
    fn on_no_tickers(&self) {
        println!("No tickers scraped from Wikipedia. Check the table structure or scraping logic.");
    }

    fn on_download_start(&self, tickers: usize, start: NaiveDate, end: NaiveDate) {
        println!("Downloading data for {tickers} companies from {start} to {end}...");
    }

    fn on_batch_start(&self, index: usize, total: usize, tickers: &[String]) {
        println!("Downloading batch {index}/{total}: {tickers:?}");
    }

    fn on_batch_error(&self, _index: usize, tickers: &[String], error: &DataError) {
        println!("Error downloading batch {tickers:?}: {error}");
    }

    fn on_batch_empty(&self, _index: usize, tickers: &[String]) {
        println!("No data returned for batch: {tickers:?}");
    }

    fn on_written(&self, path: &Path) {
        println!("Data saved to {}", path.display());
    }

    fn on_nothing_downloaded(&self) {
        println!("No data was downloaded successfully. Check ticker format or Yahoo Finance availability.");
    }
}
