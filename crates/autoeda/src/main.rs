//! CLI entry point for automated exploratory data analysis.

use anyhow::{Result, anyhow};
use autoeda::{
    AnalysisConfig, AnalysisError, AnalysisOutcome, AnalysisReport, Analyzer, ValidationPolicy,
};
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{error, info};

#[cfg(feature = "ai")]
use autoeda::ai::{DEFAULT_MODEL, GeminiConfig, GeminiProvider, SUPPORTED_MODELS};
#[cfg(feature = "ai")]
use autoeda::reporting::ReportGenerator;
#[cfg(feature = "ai")]
use std::env;
#[cfg(feature = "ai")]
use std::sync::Arc;
#[cfg(feature = "ai")]
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automated exploratory data analysis for CSV datasets",
    long_about = "Validates a dataset, classifies its columns, and reports missing values,\n\
                  categorical modes, correlations, and outliers.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  GEMINI_API_KEY    API key for Google Gemini (required for --narrative)\n\n\
                  EXAMPLES:\n  \
                  # Analyze a dataset\n  \
                  autoeda -i data.csv\n\n  \
                  # Semicolon-separated file, analyze even if small\n  \
                  autoeda -i data.csv --delimiter ';' --warn-only\n\n  \
                  # JSON on stdout\n  \
                  autoeda -i data.csv --json | jq .statistics.total_outliers\n\n  \
                  # Write the JSON report and an AI narrative to reports/\n  \
                  autoeda -i data.csv --emit-report --narrative"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Warn about undersized datasets instead of rejecting them
    #[arg(long)]
    warn_only: bool,

    /// Minimum number of rows
    #[arg(long, default_value_t = autoeda::config::DEFAULT_MIN_ROWS)]
    min_rows: usize,

    /// Minimum number of columns
    #[arg(long, default_value_t = autoeda::config::DEFAULT_MIN_COLUMNS)]
    min_cols: usize,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory as <input_name>_analysis.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Generate a narrative Markdown report with Gemini (needs GEMINI_API_KEY)
    #[arg(long)]
    narrative: bool,

    /// Gemini model used for --narrative
    #[arg(long)]
    model: Option<String>,

    /// Output directory for reports
    #[arg(short, long, default_value = "reports")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout only
/// carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    let config = build_config(&args)?;
    let analyzer = Analyzer::new(config)?;

    let outcome = match analyzer.analyze_path(&args.input) {
        Ok(outcome) => outcome,
        Err(e) => return Err(report_failure(e)),
    };

    let report = outcome.report(args.input.display().to_string());

    if args.json {
        println!("{}", report.to_json_pretty()?);
    }

    if args.emit_report {
        let path = report.write_to_file(outcome.output_dir())?;
        info!("Report written to: {}", path.display());
    }

    if args.narrative {
        run_narrative(args.model.as_deref(), &outcome);
    }

    if !args.json {
        print_human_readable_summary(&report, &outcome);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    if !args.delimiter.is_ascii() {
        return Err(anyhow!("Delimiter must be a single ASCII character"));
    }

    let policy = if args.warn_only {
        ValidationPolicy::Warn
    } else {
        ValidationPolicy::Gate
    };

    Ok(AnalysisConfig::builder()
        .delimiter(args.delimiter as u8)
        .min_rows(args.min_rows)
        .min_columns(args.min_cols)
        .validation_policy(policy)
        .output_dir(&args.output)
        .build()?)
}

/// Print a user-facing explanation of a failed analysis.
fn report_failure(err: AnalysisError) -> anyhow::Error {
    if let Some(failure) = err.validation_failure() {
        eprintln!("Dataset rejected: {} rows x {} columns", failure.rows, failure.columns);
        for violation in &failure.violations {
            eprintln!("  - {}", violation);
        }
        eprintln!("Use --warn-only to analyze it anyway.");
        return anyhow!("{}", err);
    }

    error!("Analysis failed: {}", err);
    anyhow!("{} [{}]", err, err.error_code())
}

#[cfg(feature = "ai")]
fn run_narrative(model: Option<&str>, outcome: &AnalysisOutcome) {
    let api_key = match env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            warn!("GEMINI_API_KEY not set. Skipping narrative report.");
            return;
        }
    };

    let model = model.unwrap_or(DEFAULT_MODEL);
    if !SUPPORTED_MODELS.contains(&model) {
        warn!("Model '{}' is not in the tested list {:?}", model, SUPPORTED_MODELS);
    }

    let config = GeminiConfig::builder().model(model).build();
    let provider = match GeminiProvider::with_config(api_key, config) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            warn!("Could not create Gemini client: {}", e);
            return;
        }
    };

    let generator = ReportGenerator::new(provider, outcome.output_dir());
    match generator.generate(&outcome.metadata()) {
        Ok(narrative) => info!("Narrative report written to: {}", narrative.path.display()),
        Err(e) => error!("Narrative report failed: {}", e),
    }
}

#[cfg(not(feature = "ai"))]
fn run_narrative(_model: Option<&str>, _outcome: &AnalysisOutcome) {
    tracing::warn!("AI support not compiled in. Compile with --features ai to enable --narrative.");
}

/// Print a human-readable summary of the analysis.
///
/// Uses `println!` on purpose: this is the command's output, independent of
/// the log level.
fn print_human_readable_summary(report: &AnalysisReport, outcome: &AnalysisOutcome) {
    let summary = &report.summary;
    let stats = &outcome.statistics;
    let classification = &outcome.dataset.classification;

    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input: {} ({} rows x {} columns)",
        report.input_file, summary.rows, summary.columns
    );
    if !outcome.dataset.validation.is_valid() {
        println!("  (below the minimum size, analyzed because of --warn-only)");
    }
    println!();

    println!("Columns:");
    println!("  Numeric: {}", classification.valid_numeric.join(", "));
    if !classification.excluded.is_empty() {
        let excluded: Vec<&str> = classification
            .excluded
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        println!("  Identifiers (excluded): {}", excluded.join(", "));
    }
    println!("  Categorical: {}", classification.categorical.join(", "));
    println!();

    println!("Missing Values:");
    println!("  Average: {:.2}%", summary.average_missing_percentage);
    for entry in stats.missing.entries.iter().take(10) {
        println!(
            "  {:<30} {:>6.2}% ({} missing)",
            truncate_str(&entry.column, 29),
            entry.missing_percentage,
            entry.missing_count
        );
    }
    println!();

    println!("Outliers (IQR): {}", summary.total_outliers);
    for column in stats.outliers.iter().filter(|c| c.count > 0) {
        println!("  {:<30} {}", truncate_str(&column.column, 29), column.count);
    }
    println!();

    if summary.top_correlations.is_empty() {
        println!("Top Correlations: none (fewer than two numeric columns)");
    } else {
        println!("Top Correlations:");
        for pair in &summary.top_correlations {
            println!("  {:<40} {:>8.4}", pair.label(), pair.coefficient);
        }
    }
    println!();

    if !summary.modes.is_empty() {
        println!("Categorical Modes:");
        for mode in &summary.modes.entries {
            println!(
                "  {:<30} {} ({} rows)",
                truncate_str(&mode.column, 29),
                mode.value,
                mode.frequency
            );
        }
        println!();
    }

    println!("{}", "=".repeat(80));
}

/// Truncate a string to max characters with ellipsis.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
