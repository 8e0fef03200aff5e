//! Ticker scraping and batched price downloads.

pub mod download;
pub mod provider;
pub mod scrape;
pub mod table;
pub mod yahoo;

pub use download::{
    build_database, run, DownloadOutcome, BATCH_SIZE, DEFAULT_END, DEFAULT_OUTPUT, DEFAULT_START,
};
pub use provider::{DataError, PriceProvider, Progress, RawBar, StdoutProgress};
pub use scrape::{extract_tickers, scrape_tickers};
pub use table::{Field, PriceTable};
pub use yahoo::YahooProvider;
