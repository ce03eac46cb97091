//! dlens entry point.
//!
//! This binary is intentionally thin: it validates the upload, hands the
//! file to `dlens-ingest`, and prints what `dlens-profile` computes.  All
//! parsing and profiling logic lives in the library crates.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use dlens_ingest::parse::parse_csv_file;
use dlens_ingest::validate::validate_upload;
use dlens_ingest::Table;
use dlens_profile::{generate_insights, summarize};

#[derive(Parser)]
#[command(name = "dlens")]
#[command(about = "DataLens CSV profiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and parse a CSV file, printing its shape
    Check {
        /// Path to a .csv file
        file: PathBuf,
    },

    /// Profile a CSV file: summary statistics plus generated insights
    Profile {
        /// Path to a .csv file
        file: PathBuf,

        /// Emit one JSON document instead of human-readable text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Check { file } => run_check(&file),
        Commands::Profile { file, json } => run_profile(&file, json),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_table(file: &Path) -> Result<Table> {
    validate_upload(file).with_context(|| format!("rejected '{}'", file.display()))?;
    let table =
        parse_csv_file(file).with_context(|| format!("cannot parse '{}'", file.display()))?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "parsed {}",
        file.display()
    );
    Ok(table)
}

fn run_check(file: &Path) -> Result<()> {
    let table = load_table(file)?;
    println!(
        "ok rows={} columns={}",
        table.row_count(),
        table.column_count()
    );
    println!("columns: {}", table.columns.join(", "));
    Ok(())
}

fn run_profile(file: &Path, as_json: bool) -> Result<()> {
    let table = load_table(file)?;
    let summary = summarize(&table);
    let insights = generate_insights(&table);

    if as_json {
        let doc = json!({
            "summary": summary,
            "insights": insights,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!(
        "rows={} columns={} numeric_columns={} text_columns={}",
        summary.total_rows, summary.total_columns, summary.numeric_columns, summary.text_columns
    );

    println!();
    println!("columns:");
    for (column, column_type) in &summary.column_types {
        let missing = summary.missing_values.get(column).copied().unwrap_or(0);
        println!("  {column}: {} missing={missing}", column_type.as_str());
    }

    println!();
    println!("insights:");
    for (i, insight) in insights.iter().enumerate() {
        println!(
            "  {}. [{}/{}] {}",
            i + 1,
            insight.kind.as_str(),
            insight.confidence.as_str(),
            insight.title
        );
        println!("     {}", insight.description);
    }

    Ok(())
}
