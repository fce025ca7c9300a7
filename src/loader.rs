//! Batch loading of result files
//!
//! Discovers result files (directories are walked recursively, sorted by
//! path), normalizes and aggregates each one, and records per-file failures
//! so one bad file does not stop the batch.

use crate::error::{ReportError, Result};
use crate::model::PerformanceTestRunResult;
use crate::normalize::{FileFormat, Normalizer};
use crate::regression::aggregate_run;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// A file that could not be used, with the reason
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: ReportError,
}

/// Runs loaded from a batch of files plus the files that failed
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub runs: Vec<PerformanceTestRunResult>,
    pub failures: Vec<LoadFailure>,
}

/// Expand result paths into files of the given format
///
/// Explicit file paths are kept in argument order whatever their extension.
/// Directories contribute their matching files sorted by path. Duplicates
/// and the `exclude` path are dropped, comparing canonical paths.
///
/// # Errors
/// `Configuration` when a path does not exist.
pub fn discover_files(
    paths: &[PathBuf],
    format: FileFormat,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| {
                    entry
                        .map_err(|e| warn!("Skipping unreadable entry under {}: {}", path.display(), e))
                        .ok()
                })
                .filter(|entry| entry.file_type().is_file() && format.matches(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            return Err(ReportError::Configuration(format!(
                "result path does not exist: {}",
                path.display()
            )));
        }
    }

    let excluded = exclude.map(canonical);
    let mut seen = HashSet::new();
    files.retain(|f| {
        let key = canonical(f);
        Some(&key) != excluded.as_ref() && seen.insert(key)
    });
    Ok(files)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Display name of a run: the file stem of its source
pub fn result_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Normalize and aggregate one file
pub fn load_file(
    path: &Path,
    normalizer: Normalizer,
    is_baseline: bool,
) -> Result<PerformanceTestRunResult> {
    let mut run = normalizer.load(path)?;
    aggregate_run(&mut run);

    let mut result = PerformanceTestRunResult::new(result_name(path), run);
    result.is_baseline = is_baseline;
    result.source = Some(path.to_path_buf());
    Ok(result)
}

/// Load every file, skipping (and recording) the ones that fail
///
/// # Errors
/// Only non-recoverable errors abort the batch.
pub fn load_runs(files: &[PathBuf], normalizer: Normalizer) -> Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();

    for path in files {
        match load_file(path, normalizer, false) {
            Ok(run) => {
                info!(
                    "Loaded {} ({} tests) from {}",
                    run.result_name,
                    run.run.results.len(),
                    path.display()
                );
                outcome.runs.push(run);
            }
            Err(error) if error.is_recoverable() => {
                warn!("Skipping {}: {}", path.display(), error);
                outcome.failures.push(LoadFailure {
                    path: path.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(outcome)
}

/// Resolve and load the single baseline run
///
/// # Errors
/// `Configuration` when the path resolves to zero or several files; any
/// load error of the baseline file itself is returned as-is.
pub fn load_baseline(path: &Path, normalizer: Normalizer) -> Result<PerformanceTestRunResult> {
    let files = discover_files(&[path.to_path_buf()], normalizer.format(), None)?;
    let file = match files.as_slice() {
        [single] => single,
        [] => {
            return Err(ReportError::Configuration(format!(
                "no {} baseline file found at {}",
                normalizer.format().extension(),
                path.display()
            )))
        }
        many => {
            return Err(ReportError::Configuration(format!(
                "baseline path {} resolves to {} files; exactly one is allowed",
                path.display(),
                many.len()
            )))
        }
    };

    let baseline = load_file(file, normalizer, true)?;
    info!(
        "Loaded baseline {} ({} tests) from {}",
        baseline.result_name,
        baseline.run.results.len(),
        file.display()
    );
    Ok(baseline)
}
