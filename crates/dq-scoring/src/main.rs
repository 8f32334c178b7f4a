//! Column-level Data Quality Scoring CLI
//!
//! Scores every CSV table in a directory and writes the results.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use dq_scoring::{CsvDirectoryLoader, QualityConfig, QualityEngine, QualityRunResult};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Column-level data quality scoring",
    long_about = "Scores every column of every CSV table in a directory along six quality \
                  dimensions (completeness, validity, uniqueness, accuracy, consistency, \
                  conformity) and rolls the results up per table.\n\n\
                  The overall score is the mean of five dimensions; uniqueness is reported \
                  but never scored.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DQ_THRESHOLD    Pass threshold used when --threshold is not given\n  \
                  RUST_LOG        Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Score the default data directory\n  \
                  dq-scoring\n\n  \
                  # Only the order tables, with a lower bar\n  \
                  dq-scoring --data-dir data/raw --include orders --threshold 95\n\n  \
                  # Machine-readable summary, nothing written to disk\n  \
                  dq-scoring --json --no-write"
)]
struct Args {
    /// Directory containing the source CSV files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving the result files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pass threshold in percent (0 - 100)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Only load files whose name contains this pattern (repeatable)
    #[arg(short, long = "include")]
    include: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Print the run summary and skipped tables as JSON to stdout (logs go to stderr)
    #[arg(long)]
    json: bool,

    /// Do not write any result files
    #[arg(long)]
    no_write: bool,

    /// Also write the column profiles and the profiling summary
    #[arg(long)]
    profile: bool,
}

fn init_logging(level: &str, quiet: bool, json_output: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // Keep stdout clean for the JSON document
    if json_output {
        subscriber.with_writer(std::io::stderr).init();
    } else {
        subscriber.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let config = build_config(&args)?;
    info!(
        "Checking {} (threshold {:.2})",
        config.data_dir.display(),
        config.threshold
    );

    let loader = CsvDirectoryLoader::from_config(&config);
    let engine = QualityEngine::builder()
        .config(config)
        .on_progress(|update| {
            debug!("[{:.0}%] {}", update.progress * 100.0, update.message);
        })
        .build()?;

    let result = engine.run(&loader)?;

    let written = engine.write_reports(&result, args.profile)?;
    for path in &written {
        debug!("Wrote {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary_document())?);
    } else {
        print_human_readable_summary(&result, &written);
    }

    Ok(())
}

/// Merge the config file, environment and flags into one validated config.
///
/// Precedence: flag, then `DQ_THRESHOLD` (threshold only), then file, then defaults.
fn build_config(args: &Args) -> Result<QualityConfig> {
    let mut config = match &args.config {
        Some(path) => QualityConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => QualityConfig::default(),
    };

    let env_threshold = match env::var("DQ_THRESHOLD") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<f64>()
                .map_err(|e| anyhow!("DQ_THRESHOLD '{}' is not a number: {}", raw, e))?,
        ),
        Err(_) => None,
    };
    if let Some(threshold) = args.threshold.or(env_threshold) {
        config.threshold = threshold;
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if !args.include.is_empty() {
        config.include_patterns = args.include.clone();
    }
    if args.no_write {
        config.write_outputs = false;
    }

    config.validate()?;
    Ok(config)
}

/// Print a per-table pass/fail summary.
fn print_human_readable_summary(result: &QualityRunResult, written: &[PathBuf]) {
    let summary = &result.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY SUMMARY");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Columns: {} total, {} passed, {} failed ({:.2}% pass rate)",
        summary.total_columns,
        summary.passed_columns,
        summary.failed_columns,
        summary.overall_pass_rate
    );
    println!("Threshold: {:.2}", summary.threshold);
    println!("Note: {}", summary.note);
    println!();

    if summary.tables.is_empty() {
        println!("No tables were checked.");
    } else {
        println!("Tables:");
        for table in &summary.tables {
            println!(
                "  {} {:<40} {:>6.2}  ({}/{} columns passed)",
                if table.passed { "PASS" } else { "FAIL" },
                table.table_name,
                table.average_score,
                table.passed_columns,
                table.total_columns
            );
        }
    }
    println!();

    if !result.skipped_tables.is_empty() {
        println!("Skipped:");
        for skipped in &result.skipped_tables {
            println!("  ! {}: {}", skipped.table_name, skipped.reason);
        }
        println!();
    }

    if !written.is_empty() {
        println!("Files written:");
        for path in written {
            println!("  {}", path.display());
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
