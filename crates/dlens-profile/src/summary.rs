//! Table-level summary: per-column type inference and missing-value counts.

use std::collections::BTreeMap;

use dlens_ingest::{CellValue, Table};
use serde::Serialize;

/// Share of rows that must match a type for a column to be assigned it.
/// The comparison is strictly greater-than: a column that is exactly 80%
/// numeric stays text.
pub const TYPE_MAJORITY_THRESHOLD: f64 = 0.8;

/// Inferred semantic type of a column, decided by majority vote across all
/// rows.  Numeric is tested before boolean, so a column that clears the
/// threshold for both is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Boolean,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
        }
    }
}

/// Aggregate description of a table.  Recomputed from scratch whenever the
/// table changes; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Count of columns typed [`ColumnType::Numeric`].
    pub numeric_columns: usize,
    /// Count of columns typed [`ColumnType::Text`].  Boolean columns count
    /// toward neither this nor `numeric_columns`.
    pub text_columns: usize,
    pub column_types: BTreeMap<String, ColumnType>,
    /// Missing-cell count per column.
    pub missing_values: BTreeMap<String, usize>,
}

/// Compute a [`DataSummary`] for a table.
///
/// Empty input produces the zero-valued summary.  Missing means a
/// [`CellValue::Missing`] cell or empty text (see
/// [`CellValue::is_missing`]).
pub fn summarize(table: &Table) -> DataSummary {
    if table.rows.is_empty() {
        return DataSummary::default();
    }

    let total_rows = table.rows.len();
    let threshold = total_rows as f64 * TYPE_MAJORITY_THRESHOLD;

    let mut column_types: BTreeMap<String, ColumnType> = BTreeMap::new();
    let mut missing_values: BTreeMap<String, usize> = BTreeMap::new();

    for (idx, name) in table.columns.iter().enumerate() {
        let mut numeric_count = 0usize;
        let mut boolean_count = 0usize;
        let mut missing_count = 0usize;

        for row in &table.rows {
            match row.cells.get(idx) {
                None => missing_count += 1,
                Some(cell) if cell.is_missing() => missing_count += 1,
                Some(CellValue::Number(_)) => numeric_count += 1,
                Some(CellValue::Boolean(_)) => boolean_count += 1,
                Some(_) => {}
            }
        }

        let column_type = if numeric_count as f64 > threshold {
            ColumnType::Numeric
        } else if boolean_count as f64 > threshold {
            ColumnType::Boolean
        } else {
            ColumnType::Text
        };

        column_types.insert(name.clone(), column_type);
        missing_values.insert(name.clone(), missing_count);
    }

    let numeric_columns = column_types
        .values()
        .filter(|t| **t == ColumnType::Numeric)
        .count();
    let text_columns = column_types
        .values()
        .filter(|t| **t == ColumnType::Text)
        .count();

    DataSummary {
        total_rows,
        total_columns: table.columns.len(),
        numeric_columns,
        text_columns,
        column_types,
        missing_values,
    }
}

/// Names of the columns typed numeric, in header order.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    if table.rows.is_empty() {
        return Vec::new();
    }
    let summary = summarize(table);
    table
        .columns
        .iter()
        .filter(|c| summary.column_types.get(*c) == Some(&ColumnType::Numeric))
        .cloned()
        .collect()
}

/// Non-missing, non-boolean values of a column, in row order.
pub fn column_values(table: &Table, column: &str) -> Vec<CellValue> {
    table
        .column_cells(column)
        .into_iter()
        .filter(|c| !c.is_missing() && !matches!(c, CellValue::Boolean(_)))
        .cloned()
        .collect()
}
