//! A table with stock-export headers must be profiled by the stock-specific
//! generator instead of the generic descriptive path.

use dlens_ingest::parse::parse_csv_str;
use dlens_profile::{generate_insights, InsightKind};

const STOCK_CSV: &str = "\
Date,Price,Open,High,Low,Vol.,Change%
11/14/2025,276.41,271.40,278.56,270.70,31.65M,-0.78%
11/13/2025,278.57,282.34,282.84,277.24,29.49M,-2.84%
11/12/2025,286.71,291.67,292.01,283.69,24.83M,-1.58%
11/11/2025,291.31,287.74,291.92,287.32,19.84M,0.42%
11/10/2025,290.09,288.50,291.00,287.00,21.00M,1.10%
11/07/2025,287.00,286.00,288.00,284.50,20.10M,-0.30%";

#[test]
fn stock_headers_route_to_stock_generator() {
    let table = parse_csv_str(STOCK_CSV).unwrap();
    let insights = generate_insights(&table);

    assert!(!insights.is_empty());
    assert_eq!(insights[0].title, "Stock Performance Overview");
    // The generic overview must not appear alongside the stock output.
    assert!(!insights.iter().any(|i| i.title == "Dataset Overview"));
    assert!(insights.len() <= 8);
}

#[test]
fn stock_output_covers_volatility_and_trend() {
    let table = parse_csv_str(STOCK_CSV).unwrap();
    let insights = generate_insights(&table);

    assert!(insights
        .iter()
        .any(|i| i.kind == InsightKind::Trend && i.title.contains("Volatility")));
    assert!(insights
        .iter()
        .any(|i| i.kind == InsightKind::Trend && i.title.contains("Price Trend")));
    assert!(insights.iter().any(|i| i.title == "Key Price Levels"));
}

#[test]
fn single_matching_header_is_enough() {
    // Only `Price` matches the known set; still stock mode.
    let table = parse_csv_str("Price,volume\n100,5\n101,6\n99,7").unwrap();
    let insights = generate_insights(&table);
    assert_eq!(insights[0].title, "Stock Performance Overview");
}

#[test]
fn lowercase_headers_stay_on_generic_path() {
    let table = parse_csv_str("date,price\nmon,100\ntue,101").unwrap();
    let insights = generate_insights(&table);
    assert_eq!(insights[0].title, "Dataset Overview");
}
