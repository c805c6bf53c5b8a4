// src/parse/mod.rs
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use thiserror::Error;
use tracing::{debug, trace};

pub mod month;
pub mod number;

pub use month::{parse_date, MonthKey};
pub use number::parse_number;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: column {column} holds {value:?}, expected a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
    #[error("line {line}: column {column} holds {value:?}, expected a YYYY-MM date")]
    InvalidDate {
        line: u64,
        column: String,
        value: String,
    },
    #[error("header is missing required column {0}")]
    MissingColumn(String),
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Header plus data lines of one CSV body, cells still untyped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawTable {
    /// Column names, in header order.
    pub headers: Vec<String>,
    /// One entry per non-blank data line, each with its 1-based source line.
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: u64,
    pub cells: Vec<String>,
}

/// Split `text` on CR/LF and commas. No quoting or escaping: a `"` is an
/// ordinary character. Blank lines are skipped wherever they appear.
pub fn parse_table(text: &str) -> Result<RawTable, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // row widths are checked by the caller, not here
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut table = RawTable::default();
    let mut record = StringRecord::new();
    let mut seen_header = false;

    while rdr.read_record(&mut record)? {
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if !seen_header {
            table.headers = cells;
            seen_header = true;
        } else {
            table.rows.push(RawRow { line, cells });
        }
    }

    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed csv table"
    );
    Ok(table)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|c| c.trim().is_empty()) && record.len() <= 1
}

impl RawTable {
    /// Serialize back to comma-delimited text, one line per row.
    pub fn to_csv_string(&self) -> Result<String, ParseError> {
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(Vec::new());
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(&row.cells)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ParseError::Csv(csv::Error::from(e.into_error())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A cell of a generically parsed row.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Number(f64),
}

impl Field {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(v) => Some(*v),
            Field::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            Field::Number(_) => None,
        }
    }
}

/// One data line zipped onto the header names, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: u64,
    pub fields: Vec<(String, Field)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, f)| f)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Field::as_number)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Field::as_text)
    }
}

/// Parse `text` into schema-less rows. Cells are zipped to header names by
/// position: surplus cells are dropped and missing ones are simply absent.
/// Columns listed in `numeric` are coerced, and a malformed cell fails the
/// whole parse with its line and column.
pub fn parse_rows(text: &str, numeric: &[&str]) -> Result<(Vec<String>, Vec<Row>), ParseError> {
    let table = parse_table(text)?;
    let mut rows = Vec::with_capacity(table.rows.len());

    for raw in &table.rows {
        let mut fields = Vec::with_capacity(table.headers.len());
        for (name, cell) in table.headers.iter().zip(raw.cells.iter()) {
            let field = if numeric.contains(&name.as_str()) {
                let value = parse_number(cell).ok_or_else(|| ParseError::InvalidNumber {
                    line: raw.line,
                    column: name.clone(),
                    value: cell.clone(),
                })?;
                Field::Number(value)
            } else {
                Field::Text(cell.clone())
            };
            fields.push((name.clone(), field));
        }
        trace!(line = raw.line, fields = fields.len(), "row");
        rows.push(Row {
            line: raw.line,
            fields,
        });
    }

    Ok((table.headers, rows))
}
