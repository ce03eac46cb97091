//! CSV text → [`Table`] parsing.
//!
//! The parser is tolerant of the irregularities real-world exports carry:
//! quoted fields with embedded commas, `""`-escaped quotes, blank lines, and
//! ragged rows.  Row-level malformation is never fatal — a row whose field
//! count does not match the header is dropped with a `tracing` warning, and
//! a row whose cells are all missing is discarded.  Only whole-file failures
//! (no data at all, or nothing survives filtering) return an error.
//!
//! ## Coercion precedence (per field, after trimming)
//!
//! 1. finite number, unless the field is the exact literal `true`/`false`
//! 2. boolean (`true`/`false`, case-insensitive)
//! 3. empty → [`CellValue::Missing`]
//! 4. anything else → [`CellValue::Text`]

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::{CellValue, Row, Table};

/// Whole-file parse failures.  Row-level problems are not errors; they are
/// skipped and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer than two non-blank lines: no header + data pair exists.
    InsufficientRows,
    /// Every data line was blank, ragged, or fully empty after coercion.
    NoValidRows,
    /// An I/O error from the file-level entry point.
    Io(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InsufficientRows => {
                write!(f, "csv must have at least a header row and one data row")
            }
            FormatError::NoValidRows => write!(f, "no valid data rows found in csv"),
            FormatError::Io(msg) => write!(f, "csv io error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Parse a CSV file at `path`.
///
/// Reads the whole file into memory and delegates to [`parse_csv_str`]; the
/// caller is expected to have run [`crate::validate::validate_upload`] first
/// so oversized files never reach this point.
pub fn parse_csv_file(path: &Path) -> Result<Table, FormatError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| FormatError::Io(format!("open '{}': {e}", path.display())))?;

    let mut buf = String::new();
    file.read_to_string(&mut buf)
        .map_err(|e| FormatError::Io(format!("read '{}': {e}", path.display())))?;

    parse_csv_str(&buf)
}

/// Parse CSV from a string slice.
///
/// The first line is the header; its fields become the column names,
/// order-preserving and without de-duplication.  Every surviving row has
/// exactly as many cells as there are columns.
pub fn parse_csv_str(src: &str) -> Result<Table, FormatError> {
    let lines: Vec<&str> = src.trim().lines().collect();
    if lines.len() < 2 {
        return Err(FormatError::InsufficientRows);
    }

    let columns: Vec<String> = split_csv_line(lines[0])
        .iter()
        .map(|f| strip_outer_quotes(f).to_string())
        .collect();

    let mut rows: Vec<Row> = Vec::new();

    for (i, raw) in lines.iter().enumerate().skip(1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields = split_csv_line(line);
        if fields.len() != columns.len() {
            tracing::warn!(
                line = i + 1,
                fields = fields.len(),
                expected = columns.len(),
                "dropping row with mismatched field count"
            );
            continue;
        }

        let cells: Vec<CellValue> = fields
            .iter()
            .map(|f| coerce_field(strip_outer_quotes(f)))
            .collect();

        // Fully empty rows carry no information even when the field count
        // matched.
        if cells.iter().all(|c| matches!(c, CellValue::Missing)) {
            continue;
        }

        rows.push(Row { cells });
    }

    if rows.is_empty() {
        return Err(FormatError::NoValidRows);
    }

    Ok(Table { columns, rows })
}

/// Quote-aware field split for a single line.
///
/// A `"` outside quotes opens a quoted section; inside quotes, `""` decodes
/// to one literal quote and a lone `"` closes the section.  Commas split
/// fields only outside quotes.  Each field is trimmed.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Second-pass cleanup: drop one leading and one trailing literal quote.
/// The state machine already consumes balanced quoting, so this only fires
/// for stray unbalanced quotes.
fn strip_outer_quotes(field: &str) -> &str {
    let s = field.strip_prefix('"').unwrap_or(field);
    s.strip_suffix('"').unwrap_or(s)
}

/// Coerce a trimmed field into a typed cell.
fn coerce_field(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Missing;
    }

    // The exact literals `true`/`false` are reserved for booleans even
    // though they would not parse as numbers anyway.
    if field != "true" && field != "false" {
        if let Ok(n) = field.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
    }

    if field.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }

    CellValue::Text(field.to_string())
}
