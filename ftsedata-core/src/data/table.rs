//! Wide OHLCV price table.
//!
//! Columns are `(ticker, field)` pairs, grouped by ticker; rows are keyed by
//! trading date and kept sorted. Tables merge column-wise on the union of
//! their dates, which is how per-symbol results become a batch table and how
//! batch tables become the final combined output.

use super::provider::{DataError, RawBar};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// One of the standard daily price-history fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    /// All fields, in column order.
    pub const ALL: [Field; 5] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Volume => "Volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-dimensional price table keyed by (date, ticker, field).
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    columns: Vec<(String, Field)>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the five-column table for a single ticker from its raw bars.
    pub fn from_bars(ticker: &str, bars: &[RawBar]) -> Self {
        let columns = Field::ALL
            .iter()
            .map(|f| (ticker.to_string(), *f))
            .collect();
        let mut rows = BTreeMap::new();
        for bar in bars {
            rows.insert(
                bar.date,
                vec![
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume.map(|v| v as f64),
                ],
            );
        }
        Self { columns, rows }
    }

    /// True when the table has no columns and no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Tickers present in this table, in column order, deduplicated.
    pub fn tickers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for (ticker, _) in &self.columns {
            if out.last() != Some(&ticker.as_str()) {
                out.push(ticker);
            }
        }
        out
    }

    /// Cell lookup by date, ticker, and field. Absent rows/columns read as None.
    pub fn get(&self, date: NaiveDate, ticker: &str, field: Field) -> Option<f64> {
        let col = self
            .columns
            .iter()
            .position(|(t, f)| t == ticker && *f == field)?;
        self.rows.get(&date)?.get(col).copied().flatten()
    }

    /// Append another table's columns, aligning rows on the union of dates.
    /// Dates missing from either side pad with empty cells (outer join).
    pub fn merge(&mut self, other: PriceTable) {
        let old_width = self.columns.len();
        let added = other.columns.len();
        let new_width = old_width + added;
        self.columns.extend(other.columns);

        for row in self.rows.values_mut() {
            row.resize(new_width, None);
        }
        for (date, cells) in other.rows {
            let row = self
                .rows
                .entry(date)
                .or_insert_with(|| vec![None; new_width]);
            for (j, value) in cells.into_iter().enumerate() {
                row[old_width + j] = value;
            }
        }
    }

    /// Write the table as CSV: a `Date` index column, then one
    /// `"<ticker> <field>"` column per (ticker, field). Empty cells for
    /// missing values. Overwrites the target file.
    pub fn write_csv(&self, path: &Path) -> Result<(), DataError> {
        let mut wtr = csv::Writer::from_path(path)?;

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("Date".to_string());
        for (ticker, field) in &self.columns {
            header.push(format!("{ticker} {field}"));
        }
        wtr.write_record(&header)?;

        for (date, cells) in &self.rows {
            let mut record = Vec::with_capacity(cells.len() + 1);
            record.push(date.to_string());
            for cell in cells {
                record.push(cell.map(|v| v.to_string()).unwrap_or_default());
            }
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
