//! CLI argument parsing for benchmark-reporter

use crate::normalize::FileFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What goes to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Console summary of progressions and regressions (default)
    Text,
    /// Classified runs as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "benchmark-reporter")]
#[command(version)]
#[command(
    about = "Compare performance test results against a baseline and report regressions",
    long_about = None
)]
pub struct Cli {
    /// Result file or directory (repeatable; directories are searched recursively)
    #[arg(short = 'r', long = "results", value_name = "PATH", required = true)]
    pub results: Vec<PathBuf>,

    /// Baseline result file, or a directory holding exactly one result file
    #[arg(short = 'b', long = "baseline", value_name = "PATH")]
    pub baseline: Option<PathBuf>,

    /// Directory for the HTML report (default: current directory)
    #[arg(long = "report-dir", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Encoding of the result files
    #[arg(long = "format", value_enum, default_value = "xml")]
    pub format: FileFormat,

    /// Schema version of the result files (1 or 2)
    #[arg(
        long = "data-version",
        value_name = "VERSION",
        default_value = "2",
        value_parser = clap::value_parser!(u8).range(1..=2)
    )]
    pub data_version: u8,

    /// Metric names to leave unclassified, separated by ';' (e.g., "GC.Alloc;Loading")
    #[arg(long = "ignore", value_name = "METRICS")]
    pub ignore: Option<String>,

    /// Exit with status 1 when any test regressed against the baseline
    #[arg(long = "fail-on-baseline")]
    pub fail_on_baseline: bool,

    /// Default relative threshold (0.05 = 5%) for metrics without an override
    #[arg(short = 't', long = "threshold", value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Also export a CSV next to the HTML report
    #[arg(long = "report-csv")]
    pub report_csv: bool,

    /// TOML file of accepted regressions ([[known_issue]] entries)
    #[arg(long = "known-issues", value_name = "FILE")]
    pub known_issues: Option<PathBuf>,

    /// TOML configuration file; command-line flags take precedence
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format on stdout
    #[arg(long = "output", value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Skip writing the HTML report
    #[arg(long = "no-html")]
    pub no_html: bool,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
