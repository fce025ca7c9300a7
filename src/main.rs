use anyhow::{bail, Context, Result};
use benchmark_reporter::assemble::assemble_runs;
use benchmark_reporter::cli::{Cli, OutputFormat};
use benchmark_reporter::config::ReporterConfig;
use benchmark_reporter::csv_output::CsvReport;
use benchmark_reporter::html_output::{HtmlReport, REPORT_FILE_NAME};
use benchmark_reporter::json_output::JsonReport;
use benchmark_reporter::loader::{discover_files, load_baseline, load_runs};
use benchmark_reporter::metadata::diff_environments;
use benchmark_reporter::model::{PerformanceTestRunResult, SchemaVersion};
use benchmark_reporter::normalize::Normalizer;
use benchmark_reporter::regression::{Classifier, KnownIssues};
use benchmark_reporter::summary::{exit_code, render_summary};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG (default warn)
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the configuration file with command-line overrides
fn build_classifier(cli: &Cli, file: &ReporterConfig) -> Result<Classifier> {
    let mut config = file.classifier_config();
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(ignore) = &cli.ignore {
        config = config.with_ignored_list(ignore);
    }

    let mut known_issues = file.known_issues();
    if let Some(path) = &cli.known_issues {
        let table = KnownIssues::from_file(path)
            .with_context(|| format!("Failed to load known issues from {}", path.display()))?;
        known_issues.merge(table);
    }

    Ok(Classifier::new(config, known_issues)?)
}

fn write_report(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn write_outputs(cli: &Cli, runs: &[PerformanceTestRunResult], default_threshold: f64) -> Result<()> {
    if cli.no_html && !cli.report_csv {
        return Ok(());
    }

    let dir = cli.report_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    let html_path = dir.join(REPORT_FILE_NAME);

    if !cli.no_html {
        write_report(&html_path, &HtmlReport::new(runs, default_threshold).to_html())?;
    }
    if cli.report_csv {
        write_report(
            &html_path.with_extension("csv"),
            &CsvReport::new(runs).to_csv(),
        )?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<i32> {
    let file_config = match &cli.config {
        Some(path) => ReporterConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ReporterConfig::default(),
    };
    let fail_on_baseline = cli.fail_on_baseline || file_config.fail_on_baseline.unwrap_or(false);
    let classifier = build_classifier(cli, &file_config)?;

    let version = SchemaVersion::try_from(cli.data_version).map_err(anyhow::Error::msg)?;
    let normalizer = Normalizer::new(cli.format, version);

    let baseline = match &cli.baseline {
        Some(path) => Some(
            load_baseline(path, normalizer)
                .with_context(|| format!("Failed to load baseline {}", path.display()))?,
        ),
        None => None,
    };
    let baseline_source = baseline.as_ref().and_then(|b| b.source.clone());

    let files = discover_files(&cli.results, cli.format, baseline_source.as_deref())?;
    let outcome = load_runs(&files, normalizer)?;
    if !outcome.failures.is_empty() {
        warn!(
            "{} of {} result files could not be used",
            outcome.failures.len(),
            files.len()
        );
    }
    if outcome.runs.is_empty() {
        bail!(
            "No usable {} result files found in {}",
            cli.format.extension(),
            cli.results
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut candidates = outcome.runs;
    for candidate in &mut candidates {
        let summary = classifier.classify_run(candidate, baseline.as_ref())?;
        info!(
            "Classified {}: {} matched, {} regressed, {} known, {} progressed",
            candidate.result_name,
            summary.matched,
            summary.regressed,
            summary.regressed_known,
            summary.progressed
        );
    }

    let mut runs = assemble_runs(baseline, candidates);
    diff_environments(&mut runs, &file_config.field_exclusions());

    let default_threshold = classifier.config().default_threshold;
    write_outputs(cli, &runs, default_threshold)?;

    let code = exit_code(&runs, fail_on_baseline);
    match cli.output {
        OutputFormat::Text => print!("{}", render_summary(&runs, default_threshold, fail_on_baseline)),
        OutputFormat::Json => {
            println!("{}", JsonReport::new(&runs, default_threshold, code).to_json()?)
        }
    }

    Ok(code)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let code = run(&cli)?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
