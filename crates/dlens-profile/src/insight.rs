//! Insight generation: ranked, human-readable observations about a table.
//!
//! Insights are ad hoc descriptive heuristics over simple aggregates — the
//! deliverable is explanatory text, not a statistical inference system.
//! They are recomputed on every table change and never mutated afterwards.

use dlens_ingest::Table;
use serde::Serialize;
use serde_json::json;

use crate::stats;
use crate::stock;
use crate::summary::{summarize, ColumnType};

/// Upper bound on the generic insight list.
pub const MAX_GENERIC_INSIGHTS: usize = 10;

/// Row count above which the large-dataset insight fires.
pub const LARGE_DATASET_THRESHOLD: usize = 1000;

/// How many outlier values are carried in an outlier insight's details.
pub const MAX_REPORTED_OUTLIERS: usize = 5;

/// Category tag for an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Summary,
    Trend,
    Correlation,
    Outlier,
    Distribution,
}

/// Informal confidence grade attached to each insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Summary => "summary",
            InsightKind::Trend => "trend",
            InsightKind::Correlation => "correlation",
            InsightKind::Outlier => "outlier",
            InsightKind::Distribution => "distribution",
        }
    }
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// A headline figure attached to an insight, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InsightValue {
    Number(f64),
    Text(String),
}

/// A single generated observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<InsightValue>,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Insight {
    pub(crate) fn new(
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        Insight {
            kind,
            title: title.into(),
            description: description.into(),
            value: None,
            confidence,
            column: None,
            details: None,
        }
    }

    pub(crate) fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub(crate) fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Generate the ranked insight list for a table.
///
/// When the header matches known stock-export column names the specialised
/// OHLCV generator runs **instead of** the generic path, capped at
/// [`stock::MAX_STOCK_INSIGHTS`].  The generic path emits, in order: a
/// dataset overview, per-numeric-column statistics and IQR outliers, the
/// single worst missing-data column, a correlation hint, and a large-dataset
/// flag — truncated to [`MAX_GENERIC_INSIGHTS`].
pub fn generate_insights(table: &Table) -> Vec<Insight> {
    if table.rows.is_empty() {
        return Vec::new();
    }

    if stock::is_stock_table(table) {
        return stock::generate_stock_insights(table);
    }

    let summary = summarize(table);
    let mut insights: Vec<Insight> = Vec::new();

    insights.push(Insight::new(
        InsightKind::Summary,
        "Dataset Overview",
        format!(
            "Your dataset contains {} rows and {} columns, with {} numeric columns for analysis.",
            summary.total_rows, summary.total_columns, summary.numeric_columns
        ),
        Confidence::High,
    ));

    // Per-column statistics and outliers, in header order.
    for (idx, column) in table.columns.iter().enumerate() {
        if summary.column_types.get(column) != Some(&ColumnType::Numeric) {
            continue;
        }

        let values: Vec<f64> = table
            .rows
            .iter()
            .filter_map(|r| r.cells.get(idx).and_then(|c| c.as_number()))
            .collect();
        if values.is_empty() {
            continue;
        }

        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        let mean = stats::mean(&values);
        let median = stats::median_of_sorted(&sorted);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        insights.push(
            Insight::new(
                InsightKind::Summary,
                format!("{column} Statistics"),
                format!(
                    "Average: {mean:.2}, Median: {median:.2}, Range: {min:.2} to {max:.2}"
                ),
                Confidence::High,
            )
            .with_column(column.clone())
            .with_details(json!({
                "mean": mean,
                "median": median,
                "min": min,
                "max": max,
                "range": max - min,
            })),
        );

        let outliers = stats::iqr_outliers(&values);
        if !outliers.is_empty() {
            let reported: Vec<f64> =
                outliers.iter().copied().take(MAX_REPORTED_OUTLIERS).collect();
            insights.push(
                Insight::new(
                    InsightKind::Outlier,
                    format!("Outliers Detected in {column}"),
                    format!(
                        "Found {} potential outliers that may need attention or represent interesting data points.",
                        outliers.len()
                    ),
                    Confidence::Medium,
                )
                .with_column(column.clone())
                .with_details(json!({ "outliers": reported })),
            );
        }
    }

    // Only the single worst missing-data column is reported.
    let worst_missing = summary
        .missing_values
        .iter()
        .filter(|(_, count)| **count > 0)
        .max_by_key(|(_, count)| **count);
    if let Some((column, missing_count)) = worst_missing {
        let percentage = *missing_count as f64 / summary.total_rows as f64 * 100.0;
        insights.push(
            Insight::new(
                InsightKind::Summary,
                "Missing Data Alert",
                format!(
                    "Column \"{column}\" has {missing_count} missing values ({percentage:.1}% of data). Consider data cleaning strategies."
                ),
                Confidence::High,
            )
            .with_column(column.clone())
            .with_details(json!({
                "missing_count": missing_count,
                "percentage": percentage,
            })),
        );
    }

    let numeric_cols: Vec<&String> = table
        .columns
        .iter()
        .filter(|c| summary.column_types.get(*c) == Some(&ColumnType::Numeric))
        .collect();
    if numeric_cols.len() >= 2 {
        insights.push(
            Insight::new(
                InsightKind::Correlation,
                "Correlation Analysis Available",
                format!(
                    "With {} numeric columns, you can explore relationships between variables like {} and {}.",
                    numeric_cols.len(),
                    numeric_cols[0],
                    numeric_cols[1]
                ),
                Confidence::Medium,
            )
            .with_details(json!({ "numeric_columns": numeric_cols })),
        );
    }

    if summary.total_rows > LARGE_DATASET_THRESHOLD {
        insights.push(Insight::new(
            InsightKind::Distribution,
            "Large Dataset Detected",
            format!(
                "With {} rows, this dataset is suitable for advanced statistical analysis and machine learning applications.",
                summary.total_rows
            ),
            Confidence::High,
        ));
    }

    insights.truncate(MAX_GENERIC_INSIGHTS);
    insights
}
