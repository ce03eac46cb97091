//! Descriptive statistics over numeric column values.
//!
//! Everything here is intentionally simple aggregation: means, medians,
//! floor-index quartiles, and 1.5×IQR outlier fences.  No significance
//! testing, no estimators.

use serde::Serialize;

/// Multiplier on the interquartile range for the outlier fences.
pub const IQR_OUTLIER_MULTIPLIER: f64 = 1.5;

/// Full descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; the smallest wins ties.
    pub mode: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub variance: f64,
    pub count: usize,
}

/// Compute [`ColumnStats`] over a set of values, or `None` when empty.
pub fn column_stats(values: &[f64]) -> Option<ColumnStats> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted_copy(values);
    let mean = mean(values);
    let median = median_of_sorted(&sorted);
    let mode = mode_of_sorted(&sorted);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    Some(ColumnStats {
        mean,
        median,
        mode,
        min,
        max,
        range: max - min,
        std_dev: variance.sqrt(),
        variance,
        count: values.len(),
    })
}

/// Arithmetic mean.  Zero for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of an already ascending-sorted, non-empty slice: the midpoint, or
/// the average of the two midpoints for even counts.
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Values outside the `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]` fences, in input order.
///
/// Quartiles are taken at the floor indices `n*0.25` and `n*0.75` of the
/// sorted values.  For `[1..9, 100]` that puts Q1 at 3, Q3 at 8, and flags
/// 100 against an upper fence of 15.5.
pub fn iqr_outliers(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let sorted = sorted_copy(values);
    let n = sorted.len();
    let q1 = sorted[(n as f64 * 0.25).floor() as usize];
    let q3 = sorted[(n as f64 * 0.75).floor() as usize];
    let fence = (q3 - q1) * IQR_OUTLIER_MULTIPLIER;

    values
        .iter()
        .copied()
        .filter(|v| *v < q1 - fence || *v > q3 + fence)
        .collect()
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Most frequent value in an ascending-sorted, non-empty slice; equal runs
/// resolve to the smaller value.
fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut mode = sorted[0];
    let mut best_run = 0usize;
    let mut current = sorted[0];
    let mut run = 0usize;

    for &v in sorted {
        if v == current {
            run += 1;
        } else {
            current = v;
            run = 1;
        }
        if run > best_run {
            best_run = run;
            mode = v;
        }
    }

    mode
}
