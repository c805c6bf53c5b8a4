// src/datasets/mod.rs
//! Fixed-schema records for the three case-study CSVs.
//!
//! Each record type declares the columns it needs. Loading resolves those
//! names against the file's header once, producing a [`ColumnMap`], and then
//! reads every row by position through that map.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::parse::{parse_date, parse_number, parse_table, MonthKey, ParseError, RawRow};

pub mod customer_orders;
pub mod financial_kpis;
pub mod parts_pricing;

pub use customer_orders::CustomerOrder;
pub use financial_kpis::FinancialEntry;
pub use parts_pricing::PartsSale;

/// Column name → position in the header, for the columns a record reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: Vec<(&'static str, usize)>,
    width: usize,
}

impl ColumnMap {
    /// Resolve every `required` column in `headers`. Header order does not
    /// matter, but each column must be present. Extra header columns are
    /// ignored.
    pub fn resolve(headers: &[String], required: &[&'static str]) -> Result<Self, ParseError> {
        let mut positions = Vec::with_capacity(required.len());
        for &name in required {
            let idx = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ParseError::MissingColumn(name.to_string()))?;
            positions.push((name, idx));
        }
        let width = positions.iter().map(|(_, i)| i + 1).max().unwrap_or(0);
        Ok(Self { positions, width })
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, i)| *i)
    }

    /// Fewest cells a row needs for every mapped column to be readable.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Typed accessor over one data line.
pub struct RowView<'a> {
    row: &'a RawRow,
    columns: &'a ColumnMap,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a RawRow, columns: &'a ColumnMap) -> Result<Self, ParseError> {
        if row.cells.len() < columns.width() {
            return Err(ParseError::ShortRow {
                line: row.line,
                expected: columns.width(),
                found: row.cells.len(),
            });
        }
        Ok(Self { row, columns })
    }

    pub fn line(&self) -> u64 {
        self.row.line
    }

    fn cell(&self, column: &str) -> Result<&'a str, ParseError> {
        self.columns
            .position(column)
            .and_then(|i| self.row.cells.get(i))
            .map(String::as_str)
            .ok_or_else(|| ParseError::MissingColumn(column.to_string()))
    }

    pub fn text(&self, column: &str) -> Result<String, ParseError> {
        self.cell(column).map(str::to_string)
    }

    pub fn number(&self, column: &str) -> Result<f64, ParseError> {
        let raw = self.cell(column)?;
        parse_number(raw).ok_or_else(|| ParseError::InvalidNumber {
            line: self.row.line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn date(&self, column: &str) -> Result<NaiveDate, ParseError> {
        let raw = self.cell(column)?;
        parse_date(raw).ok_or_else(|| ParseError::InvalidDate {
            line: self.row.line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn month(&self, column: &str) -> Result<MonthKey, ParseError> {
        self.date(column).map(MonthKey::from_date)
    }
}

/// A row type with a fixed column set.
pub trait Record: Sized {
    /// Columns the record reads; all must appear in the header.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &RowView<'_>) -> Result<Self, ParseError>;
}

/// Every row of one CSV body, held for the lifetime of a page view.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T> {
    pub headers: Vec<String>,
    pub rows: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Record> Dataset<T> {
    /// Parse and type every row of `text`.
    ///
    /// An empty body is an empty dataset. Otherwise the header must carry
    /// every column in `T::COLUMNS`, and any row that is too short or holds a
    /// malformed number or date fails the load.
    pub fn from_csv(text: &str) -> Result<Self, ParseError> {
        let table = parse_table(text)?;
        if table.headers.is_empty() {
            warn!("empty csv body; dataset has no rows");
            return Ok(Self {
                headers: Vec::new(),
                rows: Vec::new(),
            });
        }

        let columns = ColumnMap::resolve(&table.headers, T::COLUMNS)?;
        let rows = table
            .rows
            .iter()
            .map(|raw| RowView::new(raw, &columns).and_then(|view| T::from_row(&view)))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = rows.len(), "loaded typed dataset");
        Ok(Self {
            headers: table.headers,
            rows,
        })
    }
}
