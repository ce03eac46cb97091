//! Stock-mode insight generation for daily OHLCV exports.
//!
//! A table is routed here when any header matches the known stock-export
//! column set exactly.  Rows are assumed newest-first, as the exports this
//! targets are written.  All field values go through
//! [`dlens_ingest::numeric::parse_loose`], so display-formatted volumes
//! (`"31.65M"`) and change percentages (`"-0.78%"`) are read at their real
//! magnitudes.

use dlens_ingest::numeric::parse_loose;
use dlens_ingest::{CellValue, Table};
use serde_json::json;

use crate::insight::{Confidence, Insight, InsightKind};
use crate::stats;

/// Header names that mark a table as a stock export (case-sensitive exact
/// match on any one of them).
pub const STOCK_COLUMNS: [&str; 7] = ["Date", "Price", "Open", "High", "Low", "Vol.", "Change%"];

/// Upper bound on the stock insight list.
pub const MAX_STOCK_INSIGHTS: usize = 8;

/// A day's volume counts as high when it exceeds this multiple of the
/// average volume.
pub const HIGH_VOLUME_MULTIPLIER: f64 = 1.5;

/// RMS change-percentage bands for the volatility classification.
pub const VOLATILITY_MEDIUM: f64 = 1.5;
pub const VOLATILITY_HIGH: f64 = 3.0;

/// Shortest gain/loss streak worth reporting.
pub const MIN_STREAK_LEN: usize = 3;

/// Row window for the recent-vs-older trend comparison.
const TREND_WINDOW: usize = 5;

/// True when the table's header intersects [`STOCK_COLUMNS`].
pub fn is_stock_table(table: &Table) -> bool {
    STOCK_COLUMNS
        .iter()
        .any(|known| table.columns.iter().any(|col| col == known))
}

/// Generate the stock-specific insight list, capped at
/// [`MAX_STOCK_INSIGHTS`].  Returns an empty list when no positive prices
/// can be read.
pub fn generate_stock_insights(table: &Table) -> Vec<Insight> {
    let columns = &table.columns;
    let price_col = resolve_column(columns, "price", "Price");
    let high_col = resolve_column(columns, "high", "High");
    let low_col = resolve_column(columns, "low", "Low");
    let volume_col = resolve_column(columns, "vol", "Vol.");
    let change_col = resolve_column(columns, "change", "Change%");

    let prices: Vec<f64> = positive_series(table, &price_col);
    let volumes: Vec<f64> = positive_series(table, &volume_col);
    let highs: Vec<f64> = positive_series(table, &high_col);
    let lows: Vec<f64> = positive_series(table, &low_col);
    let changes: Vec<f64> = column_series(table, &change_col);

    if prices.is_empty() {
        return Vec::new();
    }

    let mut insights: Vec<Insight> = Vec::new();
    let trading_days = table.rows.len();

    // Overview.
    let current_price = prices[0];
    let total_return: f64 = changes.iter().sum();
    let avg_volume = stats::mean(&volumes);

    insights.push(
        Insight::new(
            InsightKind::Summary,
            "Stock Performance Overview",
            format!(
                "Analyzing {trading_days} trading days. Current price: ${current_price:.2}, Total return: {total_return:.2}%"
            ),
            Confidence::High,
        )
        .with_details(json!({
            "current_price": current_price,
            "total_return": total_return,
            "trading_days": trading_days,
        })),
    );

    // Volatility: root-mean-square of the change-percentage series.
    let volatility =
        (changes.iter().map(|c| c * c).sum::<f64>() / changes.len() as f64).sqrt();
    let level = if volatility > VOLATILITY_HIGH {
        "High"
    } else if volatility > VOLATILITY_MEDIUM {
        "Medium"
    } else {
        "Low"
    };
    let level_note = match level {
        "High" => "Consider risk management strategies.",
        "Medium" => "Moderate risk profile.",
        _ => "Relatively stable stock.",
    };

    insights.push(
        Insight::new(
            InsightKind::Trend,
            format!("{level} Volatility Detected"),
            format!(
                "Stock shows {} volatility with {volatility:.2}% average daily movement. {level_note}",
                level.to_lowercase()
            ),
            Confidence::High,
        )
        .with_details(json!({ "volatility": volatility, "level": level })),
    );

    // High-volume days, measured against the average over positive volumes.
    if !volumes.is_empty() {
        let threshold = avg_volume * HIGH_VOLUME_MULTIPLIER;
        let high_volume_days = column_series(table, &volume_col)
            .iter()
            .filter(|v| **v > threshold)
            .count();

        if high_volume_days > 0 {
            insights.push(
                Insight::new(
                    InsightKind::Outlier,
                    "High Volume Trading Days",
                    format!(
                        "{high_volume_days} days showed unusually high trading volume (>50% above average). This often indicates significant market events or news."
                    ),
                    Confidence::Medium,
                )
                .with_details(json!({
                    "high_volume_days": high_volume_days,
                    "avg_volume": avg_volume,
                    "threshold": threshold,
                })),
            );
        }
    }

    // Trend: first five rows (newest) against the last five (oldest).
    let recent_avg = stats::mean(&prices[..prices.len().min(TREND_WINDOW)]);
    let older_avg = stats::mean(&prices[prices.len().saturating_sub(TREND_WINDOW)..]);
    let upward = recent_avg > older_avg;
    let direction = if upward { "upward" } else { "downward" };
    let strength = ((recent_avg - older_avg) / older_avg * 100.0).abs();

    insights.push(
        Insight::new(
            InsightKind::Trend,
            if upward {
                "Upward Price Trend"
            } else {
                "Downward Price Trend"
            },
            format!(
                "Stock shows {direction} momentum with {strength:.1}% change between recent and earlier periods. {}",
                if upward {
                    "Positive momentum detected."
                } else {
                    "Bearish trend observed."
                }
            ),
            if strength > 5.0 {
                Confidence::High
            } else {
                Confidence::Medium
            },
        )
        .with_details(json!({
            "direction": direction,
            "strength": strength,
            "recent_avg": recent_avg,
            "older_avg": older_avg,
        })),
    );

    // Support and resistance at 20% of the high-low range.  Skipped when no
    // positive highs or lows survive filtering (the levels would not be
    // finite).
    if !highs.is_empty() && !lows.is_empty() {
        let highest = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = lows.iter().copied().fold(f64::INFINITY, f64::min);
        let price_range = highest - lowest;
        let support = lowest + price_range * 0.2;
        let resistance = highest - price_range * 0.2;

        insights.push(
            Insight::new(
                InsightKind::Correlation,
                "Key Price Levels",
                format!(
                    "Potential support around ${support:.2} and resistance near ${resistance:.2}. Price range: ${price_range:.2}"
                ),
                Confidence::Medium,
            )
            .with_details(json!({
                "support": support,
                "resistance": resistance,
                "range": price_range,
            })),
        );
    }

    // Longest run of strictly positive / strictly negative daily changes.
    let (max_gain_streak, max_loss_streak) = longest_streaks(&changes);
    if max_gain_streak >= MIN_STREAK_LEN || max_loss_streak >= MIN_STREAK_LEN {
        let gains_win = max_gain_streak >= max_loss_streak;
        let streak_len = max_gain_streak.max(max_loss_streak);
        let (streak_type, streak_title, note) = if gains_win {
            ("gain", "Gain", "Strong bullish momentum period.")
        } else {
            ("loss", "Loss", "Significant bearish pressure period.")
        };

        insights.push(
            Insight::new(
                InsightKind::Outlier,
                format!("{streak_len}-Day {streak_title} Streak"),
                format!(
                    "Longest consecutive {streak_type} streak was {streak_len} days. {note}"
                ),
                Confidence::Medium,
            )
            .with_details(json!({
                "streak_type": streak_type,
                "streak_length": streak_len,
                "max_gain_streak": max_gain_streak,
                "max_loss_streak": max_loss_streak,
            })),
        );
    }

    insights.truncate(MAX_STOCK_INSIGHTS);
    insights
}

/// First column whose lowercased name contains `needle`, else the literal
/// fallback header.
fn resolve_column(columns: &[String], needle: &str, fallback: &str) -> String {
    columns
        .iter()
        .find(|c| c.to_lowercase().contains(needle))
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// Every row's value for `column` through the lenient numeric parser;
/// missing columns and unparseable cells read as zero.
fn column_series(table: &Table, column: &str) -> Vec<f64> {
    match table.column_index(column) {
        Some(idx) => table
            .rows
            .iter()
            .map(|r| cell_to_loose_number(&r.cells[idx]))
            .collect(),
        None => vec![0.0; table.rows.len()],
    }
}

fn positive_series(table: &Table, column: &str) -> Vec<f64> {
    column_series(table, column)
        .into_iter()
        .filter(|v| *v > 0.0)
        .collect()
}

fn cell_to_loose_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(t) => parse_loose(t).unwrap_or(0.0),
        CellValue::Boolean(_) | CellValue::Missing => 0.0,
    }
}

/// Longest strictly-positive and strictly-negative runs in a change series.
/// Zero changes break both runs.
fn longest_streaks(changes: &[f64]) -> (usize, usize) {
    let mut gains = 0usize;
    let mut losses = 0usize;
    let mut max_gains = 0usize;
    let mut max_losses = 0usize;

    for &change in changes {
        if change > 0.0 {
            gains += 1;
            losses = 0;
            max_gains = max_gains.max(gains);
        } else if change < 0.0 {
            losses += 1;
            gains = 0;
            max_losses = max_losses.max(losses);
        }
    }

    (max_gains, max_losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlens_ingest::parse::parse_csv_str;

    const STOCK_HEADER: &str = "Date,Price,Open,High,Low,Vol.,Change%";

    fn stock_csv(rows: &[&str]) -> String {
        format!("{STOCK_HEADER}\n{}", rows.join("\n"))
    }

    #[test]
    fn stock_detection_needs_exact_case_sensitive_match() {
        let table = parse_csv_str(&stock_csv(&[
            "11/14/2025,276.41,271.40,278.56,270.70,31.65M,-0.78%",
        ]))
        .unwrap();
        assert!(is_stock_table(&table));

        let lowercase = parse_csv_str("date,price\n1,2").unwrap();
        assert!(!is_stock_table(&lowercase));

        let partial = parse_csv_str("Price,foo\n1,2").unwrap();
        assert!(is_stock_table(&partial));
    }

    #[test]
    fn no_positive_prices_yields_empty_list() {
        let table = parse_csv_str(&stock_csv(&["x,0,0,0,0,0,0%", "y,0,0,0,0,0,0%"])).unwrap();
        assert!(generate_stock_insights(&table).is_empty());
    }

    #[test]
    fn overview_uses_first_row_price_and_summed_changes() {
        let table = parse_csv_str(&stock_csv(&[
            "d1,100,99,101,98,1.0M,2.00%",
            "d2,98,97,99,96,1.0M,-1.00%",
            "d3,99,98,100,97,1.0M,0.50%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&table);
        let overview = &insights[0];
        assert_eq!(overview.title, "Stock Performance Overview");
        assert!(overview.description.contains("3 trading days"));
        assert!(overview.description.contains("$100.00"));
        assert!(overview.description.contains("1.50%"));
    }

    #[test]
    fn volatility_bands_classify_low_medium_high() {
        // RMS of [1, -1, 1] = 1.0 -> Low.
        let low = parse_csv_str(&stock_csv(&[
            "a,10,1,11,9,1K,1%",
            "b,10,1,11,9,1K,-1%",
            "c,10,1,11,9,1K,1%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&low);
        assert!(insights.iter().any(|i| i.title == "Low Volatility Detected"));

        // RMS of [2, -2, 2] = 2.0 -> Medium.
        let medium = parse_csv_str(&stock_csv(&[
            "a,10,1,11,9,1K,2%",
            "b,10,1,11,9,1K,-2%",
            "c,10,1,11,9,1K,2%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&medium);
        assert!(insights
            .iter()
            .any(|i| i.title == "Medium Volatility Detected"));

        // RMS of [4, -4, 4] = 4.0 -> High.
        let high = parse_csv_str(&stock_csv(&[
            "a,10,1,11,9,1K,4%",
            "b,10,1,11,9,1K,-4%",
            "c,10,1,11,9,1K,4%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&high);
        assert!(insights.iter().any(|i| i.title == "High Volatility Detected"));
    }

    #[test]
    fn volume_suffixes_read_at_real_magnitude() {
        // One 10M day against 1M days: clearly above 1.5x average.
        let table = parse_csv_str(&stock_csv(&[
            "a,10,1,11,9,10M,1%",
            "b,10,1,11,9,1M,-1%",
            "c,10,1,11,9,1M,1%",
            "d,10,1,11,9,1M,-1%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&table);
        let volume = insights
            .iter()
            .find(|i| i.title == "High Volume Trading Days")
            .unwrap();
        assert!(volume.description.starts_with("1 days"));
        let details = volume.details.as_ref().unwrap();
        assert_eq!(details["avg_volume"], serde_json::json!(3_250_000.0));
    }

    #[test]
    fn trend_compares_recent_against_older_window() {
        // Newest-first rows: recent prices higher than older ones.
        let rows: Vec<String> = (0..10)
            .map(|i| format!("d{i},{},1,200,50,1K,0%", 110 - i))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = parse_csv_str(&stock_csv(&refs)).unwrap();
        let insights = generate_stock_insights(&table);
        let trend = insights
            .iter()
            .find(|i| i.title == "Upward Price Trend")
            .unwrap();
        // recent avg 108, older avg 103 -> strength ~4.9% -> medium.
        assert_eq!(trend.confidence, Confidence::Medium);
        assert!(trend.description.contains("upward momentum"));
    }

    #[test]
    fn strong_trend_gets_high_confidence() {
        let rows: Vec<String> = (0..10)
            .map(|i| format!("d{i},{},1,500,50,1K,0%", 200 - i * 10))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = parse_csv_str(&stock_csv(&refs)).unwrap();
        let insights = generate_stock_insights(&table);
        let trend = insights
            .iter()
            .find(|i| i.title == "Upward Price Trend")
            .unwrap();
        assert_eq!(trend.confidence, Confidence::High);
    }

    #[test]
    fn support_and_resistance_at_twenty_percent_of_range() {
        let table = parse_csv_str(&stock_csv(&[
            "a,100,1,200,100,1K,0%",
            "b,150,1,180,120,1K,0%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&table);
        let levels = insights
            .iter()
            .find(|i| i.title == "Key Price Levels")
            .unwrap();
        // range 200-100=100; support 100+20=120; resistance 200-20=180.
        assert!(levels.description.contains("$120.00"));
        assert!(levels.description.contains("$180.00"));
        assert_eq!(levels.kind, InsightKind::Correlation);
    }

    #[test]
    fn streak_of_three_gains_reported() {
        let table = parse_csv_str(&stock_csv(&[
            "a,10,1,11,9,1K,1%",
            "b,10,1,11,9,1K,1%",
            "c,10,1,11,9,1K,1%",
            "d,10,1,11,9,1K,-1%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&table);
        let streak = insights
            .iter()
            .find(|i| i.title.ends_with("Streak"))
            .unwrap();
        assert_eq!(streak.title, "3-Day Gain Streak");
        assert_eq!(streak.confidence, Confidence::Medium);
    }

    #[test]
    fn short_streaks_not_reported() {
        let table = parse_csv_str(&stock_csv(&[
            "a,10,1,11,9,1K,1%",
            "b,10,1,11,9,1K,-1%",
            "c,10,1,11,9,1K,1%",
            "d,10,1,11,9,1K,-1%",
        ]))
        .unwrap();
        let insights = generate_stock_insights(&table);
        assert!(!insights.iter().any(|i| i.title.ends_with("Streak")));
    }

    #[test]
    fn loss_streak_wins_when_longer() {
        assert_eq!(longest_streaks(&[1.0, -1.0, -1.0, -1.0, -1.0, 1.0]), (1, 4));
        assert_eq!(longest_streaks(&[0.0, 0.0]), (0, 0));
        assert_eq!(longest_streaks(&[1.0, 1.0, 0.0, 1.0]), (2, 0));
    }

    #[test]
    fn insight_list_capped_at_eight() {
        let rows: Vec<String> = (0..12)
            .map(|i| {
                let change = if i % 4 == 3 { "-5%" } else { "5%" };
                format!("d{i},{},1,200,50,{}M,{change}", 150 - i, 1 + (i % 3) * 10)
            })
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = parse_csv_str(&stock_csv(&refs)).unwrap();
        let insights = generate_stock_insights(&table);
        assert!(insights.len() <= MAX_STOCK_INSIGHTS);
    }

    #[test]
    fn column_resolution_by_substring_with_fallback() {
        let cols = vec!["Closing Price".to_string(), "Volume (shares)".to_string()];
        assert_eq!(resolve_column(&cols, "price", "Price"), "Closing Price");
        assert_eq!(resolve_column(&cols, "vol", "Vol."), "Volume (shares)");
        assert_eq!(resolve_column(&cols, "change", "Change%"), "Change%");
    }
}
