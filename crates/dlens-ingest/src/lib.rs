//! dlens-ingest
//!
//! CSV ingestion for the DataLens core.  This crate owns the cell/table data
//! model and everything that turns raw CSV text into typed rows:
//!
//! - [`parse::parse_csv_str`] / [`parse::parse_csv_file`] — quote-aware
//!   parsing with per-field type coercion and malformed-row filtering.
//! - [`numeric::parse_loose`] — lenient numeric parsing for display-formatted
//!   values (`"31.65M"`, `"-0.78%"`, `"1,234"`).
//! - [`validate`] — upload-level file checks (extension, size caps).
//! - [`format::format_csv`] — the write side, used to render a table back to
//!   CSV text.
//!
//! It is the **read** side only: no statistics or insight generation happens
//! here (see `dlens-profile` for that), and nothing in this crate writes to
//! disk.

pub mod format;
pub mod numeric;
pub mod parse;
pub mod validate;

use serde::{Deserialize, Serialize};

/// A single cell after type coercion.
///
/// The closed set of variants keeps column-type inference exhaustive: a cell
/// is exactly one of a finite number, free text, a boolean, or missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    Missing,
}

impl CellValue {
    /// A cell counts as missing when it is [`CellValue::Missing`] or an
    /// empty text value (tables built by hand may carry empty strings that
    /// the parser would have coerced to `Missing`).
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(t) => t.is_empty(),
            _ => false,
        }
    }

    /// Returns the cell's numeric value, if it is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }
}

/// One parsed data record.  Cells are positionally aligned with the owning
/// [`Table`]'s `columns`; the parser guarantees equal lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

/// An in-memory table: the header (order-preserving) plus the surviving data
/// rows.  Each upload replaces the table wholesale; consumers treat it as a
/// read-only snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names from the header line.  Duplicates are preserved
    /// positionally; name lookup resolves the last match (last wins).
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the named column, resolving duplicate headers to the last
    /// occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().rposition(|c| c == name)
    }

    /// All cells of the named column, in row order.  Empty when the column
    /// does not exist.
    pub fn column_cells<'a>(&'a self, name: &str) -> Vec<&'a CellValue> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| &r.cells[idx]).collect(),
            None => Vec::new(),
        }
    }
}
