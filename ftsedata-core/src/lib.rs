//! FTSE Data Core — constituent scraping, batched downloads, CSV assembly.
//!
//! This crate contains everything behind the `ftsedata` binary:
//! - Wikipedia constituent-table scraper (the ticker lister)
//! - Data provider trait and the Yahoo Finance implementation
//! - Batch download loop with per-batch failure tolerance
//! - Wide OHLCV price table with column-wise merge and CSV export

pub mod data;
