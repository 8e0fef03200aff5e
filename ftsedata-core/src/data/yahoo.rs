//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API, one chart request per
//! symbol, assembled into a batch table with per-ticker columns grouped
//! together. Yahoo Finance has no official API and is subject to unannounced
//! format changes.

use super::provider::{DataError, PriceProvider, RawBar};
use super::table::PriceTable;
use chrono::NaiveDate;
use serde::Deserialize;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance data provider.
///
/// No retries and no explicit timeout: a faulted request fails its whole
/// batch immediately, and a hung request blocks for as long as the transport
/// default allows.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    /// Parse the chart API response into RawBars.
    ///
    /// A well-formed response with no rows in range comes back without a
    /// timestamp array; that is "no data", not an error.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormat(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormat("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormat("result array is empty".into()))?;

        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormat("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| DataError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Skip bars where all OHLCV are None (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            bars.push(RawBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(bars)
    }

    /// Fetch daily bars for one symbol.
    fn fetch_symbol(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let resp = self.client.get(&url).send()?;
        let status = resp.status();

        // Unknown symbols come back as 404 with a chart error body
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::ProviderStatus {
                symbol: symbol.to_string(),
                status,
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormat(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, chart)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    /// One chart request per symbol in the batch. Symbols Yahoo does not know
    /// (or returns nothing for) contribute no columns, mirroring how the
    /// grouped download endpoint silently drops them; any transport or format
    /// fault fails the batch as a whole.
    fn fetch_batch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        let mut table = PriceTable::new();
        for symbol in tickers {
            match self.fetch_symbol(symbol, start, end) {
                Ok(bars) if bars.is_empty() => continue,
                Ok(bars) => table.merge(PriceTable::from_bars(symbol, &bars)),
                Err(DataError::SymbolNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn chart_url_covers_whole_days() {
        let url = YahooProvider::chart_url("AZN.L", d("2020-01-01"), d("2020-01-02"));
        assert!(url.starts_with("https://query2.finance.yahoo.com/v8/finance/chart/AZN.L?"));
        // 2020-01-01T00:00:00Z .. 2020-01-02T23:59:59Z
        assert!(url.contains("period1=1577836800"));
        assert!(url.contains("period2=1578009599"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn parses_quote_arrays_into_bars() {
        // 2023-01-03T00:00:00Z, 2023-01-04T00:00:00Z
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1672704000, 1672790400],
                    "indicators": {
                        "quote": [{
                            "open":   [10.0, 11.0],
                            "high":   [12.0, 13.0],
                            "low":    [9.0, 10.5],
                            "close":  [11.0, 12.5],
                            "volume": [1000, 2000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_response("AZN.L", resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, d("2023-01-03"));
        assert_eq!(bars[0].close, Some(11.0));
        assert_eq!(bars[1].volume, Some(2000));
    }

    #[test]
    fn all_null_rows_are_dropped() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1672704000, 1672790400],
                    "indicators": {
                        "quote": [{
                            "open":   [null, 11.0],
                            "high":   [null, 13.0],
                            "low":    [null, 10.5],
                            "close":  [null, 12.5],
                            "volume": [null, 2000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_response("AZN.L", resp).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, d("2023-01-04"));
    }

    #[test]
    fn missing_timestamps_mean_no_data() {
        let json = r#"{
            "chart": {
                "result": [{
                    "indicators": { "quote": [{
                        "open": [], "high": [], "low": [], "close": [], "volume": []
                    }] }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_response("AZN.L", resp).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found" }
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_response("NOPE.L", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "NOPE.L"));
    }

    #[test]
    fn other_chart_errors_are_format_errors() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "invalid period" }
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = YahooProvider::parse_response("AZN.L", resp).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormat(_)));
    }
}
