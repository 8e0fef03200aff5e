//! FTSE 100 constituent scraper.
//!
//! Pulls the constituent table from the Wikipedia index page and extracts the
//! EPIC codes. The page's structure is not guaranteed, so extraction is a
//! heuristic: take the first `wikitable` whose header mentions "EPIC" or
//! "Ticker" and read that column. Anything else on the page is ignored.

use super::provider::DataError;
use scraper::{ElementRef, Html, Selector};

pub const FTSE_INDEX_URL: &str = "https://en.wikipedia.org/wiki/FTSE_100_Index";

/// Suffix Yahoo Finance uses for London Stock Exchange listings.
pub const LONDON_SUFFIX: &str = ".L";

/// Wikipedia rejects requests without a browser-like User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Fetch the index page and extract the ticker list.
///
/// An unreachable or erroring page is a hard failure; a reachable page with
/// no recognizable constituent table yields `Ok` with an empty list, and the
/// caller decides whether that aborts the run.
pub fn scrape_tickers() -> Result<Vec<String>, DataError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build HTTP client");

    let body = client
        .get(FTSE_INDEX_URL)
        .send()?
        .error_for_status()?
        .text()?;

    let tickers = extract_tickers(&body);
    println!("Scraped tickers: {tickers:?}");
    Ok(tickers)
}

/// Extract EPIC codes from the page body, with the `.L` suffix appended.
///
/// Scans `table.wikitable` elements in document order and commits to the
/// first one whose header row contains a cell matching "EPIC" or "Ticker"
/// (case-sensitive substring). Later tables are never consulted, even when
/// they would also match. Rows too short to reach the target column are
/// skipped, as are rows whose target cell is blank after trimming.
pub fn extract_tickers(html: &str) -> Vec<String> {
    let table_sel = Selector::parse("table.wikitable").expect("valid selector");
    let th_sel = Selector::parse("th").expect("valid selector");
    let tr_sel = Selector::parse("tr").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");

    let doc = Html::parse_document(html);
    let tables: Vec<ElementRef> = doc.select(&table_sel).collect();
    println!("Found {} wikitable tables on the index page.", tables.len());

    let mut tickers = Vec::new();
    for (idx, table) in tables.iter().enumerate() {
        let headers: Vec<String> = table.select(&th_sel).map(cell_text).collect();
        println!("Table {idx} headers: {headers:?}");

        let Some(epic_idx) = headers
            .iter()
            .position(|h| h.contains("EPIC") || h.contains("Ticker"))
        else {
            continue;
        };

        for row in table.select(&tr_sel).skip(1) {
            let cells: Vec<ElementRef> = row.select(&td_sel).collect();
            if cells.len() > epic_idx {
                let epic = cell_text(cells[epic_idx]);
                if !epic.is_empty() {
                    tickers.push(format!("{epic}{LONDON_SUFFIX}"));
                }
            }
        }
        break;
    }
    tickers
}

fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONSTITUENTS: &str = r#"
        <html><body>
        <table class="wikitable">
          <tr><th>Company</th><th>EPIC</th><th>Sector</th></tr>
          <tr><td>AstraZeneca</td><td> AZN </td><td>Pharma</td></tr>
          <tr><td>Shell</td><td>SHEL</td><td>Energy</td></tr>
          <tr><td>Orphan row</td></tr>
          <tr><td>Blank code</td><td>   </td><td>None</td></tr>
        </table>
        </body></html>"#;

    #[test]
    fn extracts_suffixed_trimmed_tickers() {
        let tickers = extract_tickers(CONSTITUENTS);
        assert_eq!(tickers, vec!["AZN.L", "SHEL.L"]);
    }

    #[test]
    fn no_matching_header_yields_empty_list() {
        let html = r#"
            <table class="wikitable">
              <tr><th>Company</th><th>Symbol</th></tr>
              <tr><td>AstraZeneca</td><td>AZN</td></tr>
            </table>"#;
        assert!(extract_tickers(html).is_empty());
    }

    #[test]
    fn zero_tables_yields_empty_list() {
        assert!(extract_tickers("<html><body><p>moved</p></body></html>").is_empty());
    }

    #[test]
    fn non_wikitable_tables_are_ignored() {
        let html = r#"
            <table class="infobox">
              <tr><th>Ticker</th></tr>
              <tr><td>WRONG</td></tr>
            </table>"#;
        assert!(extract_tickers(html).is_empty());
    }

    #[test]
    fn stops_at_first_matching_table() {
        let html = r#"
            <table class="wikitable">
              <tr><th>Year</th><th>Value</th></tr>
              <tr><td>1999</td><td>6930</td></tr>
            </table>
            <table class="wikitable">
              <tr><th>Company</th><th>Ticker</th></tr>
              <tr><td>First</td><td>AAA</td></tr>
            </table>
            <table class="wikitable">
              <tr><th>Company</th><th>EPIC</th></tr>
              <tr><td>Second</td><td>BBB</td></tr>
            </table>"#;
        // The non-matching table is passed over; the second matching table
        // is never reached.
        assert_eq!(extract_tickers(html), vec!["AAA.L"]);
    }

    #[test]
    fn short_rows_are_skipped_without_fault() {
        let html = r#"
            <table class="wikitable">
              <tr><th>Company</th><th>Industry</th><th>EPIC</th></tr>
              <tr><td>OneCell</td></tr>
              <tr><td>Full</td><td>Mining</td><td>RIO</td></tr>
            </table>"#;
        assert_eq!(extract_tickers(html), vec!["RIO.L"]);
    }

    #[test]
    fn header_match_is_case_sensitive_substring() {
        let html = r#"
            <table class="wikitable">
              <tr><th>Company</th><th>ticker</th></tr>
              <tr><td>Lowercase</td><td>AAA</td></tr>
            </table>
            <table class="wikitable">
              <tr><th>Company</th><th>EPIC code</th></tr>
              <tr><td>Substring</td><td>BBB</td></tr>
            </table>"#;
        // "ticker" does not match; "EPIC code" matches by substring.
        assert_eq!(extract_tickers(html), vec!["BBB.L"]);
    }
}
