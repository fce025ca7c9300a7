// Threshold classification of matched metrics and test-level pass/fail
//
// For each matched (candidate, baseline) pair that is not ignored:
//   diff_ratio = |candidate - baseline| / baseline
// compared against the metric's threshold (override or configured default).
// Over-threshold changes are regressions or progressions depending on
// IncreaseIsBetter; regressions listed as known issues do not fail the test.

use crate::error::{ReportError, Result};
use crate::model::{Classification, PerformanceTestRunResult, SampleGroupResult, TestState};
use crate::regression::config::ClassifierConfig;
use crate::regression::known_issues::KnownIssues;
use crate::regression::matcher::match_metrics;
use tracing::debug;

/// Direction of an over-threshold change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Better,
    Worse,
}

/// Outcome of comparing one headline value against its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricVerdict {
    WithinThreshold,
    Changed(Direction),
}

/// Relative difference `|candidate - baseline| / baseline`
///
/// `None` when the baseline is zero (the ratio is undefined). The console
/// summary uses this same function, so displayed and classified diffs agree.
///
/// # Example
/// ```
/// use benchmark_reporter::regression::diff_ratio;
///
/// assert_eq!(diff_ratio(17.5, 16.0), Some(0.09375));
/// assert_eq!(diff_ratio(1.0, 0.0), None);
/// ```
pub fn diff_ratio(candidate: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some((candidate - baseline).abs() / baseline)
}

/// Whether moving from `baseline` to `candidate` is better or worse
pub fn direction(candidate: f64, baseline: f64, increase_is_better: bool) -> Direction {
    let worse = if increase_is_better {
        candidate < baseline
    } else {
        candidate > baseline
    };
    if worse {
        Direction::Worse
    } else {
        Direction::Better
    }
}

/// Compare one metric; `None` when the baseline is zero
pub fn compare_values(
    candidate: f64,
    baseline: f64,
    threshold: f64,
    increase_is_better: bool,
) -> Option<MetricVerdict> {
    let ratio = diff_ratio(candidate, baseline)?;
    if ratio <= threshold {
        return Some(MetricVerdict::WithinThreshold);
    }
    Some(MetricVerdict::Changed(direction(
        candidate,
        baseline,
        increase_is_better,
    )))
}

/// Per-run counts of classification outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationSummary {
    pub matched: usize,
    pub unmatched: usize,
    pub ignored: usize,
    /// Matched but not classifiable (zero baseline or empty samples)
    pub skipped: usize,
    pub regressed: usize,
    pub regressed_known: usize,
    pub progressed: usize,
    pub failed_tests: usize,
}

/// Threshold classifier with its configuration and known-issue table
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
    known_issues: KnownIssues,
}

impl Classifier {
    pub fn new(config: ClassifierConfig, known_issues: KnownIssues) -> Result<Self> {
        config.validate().map_err(ReportError::Configuration)?;
        Ok(Self {
            config,
            known_issues,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn known_issues(&self) -> &KnownIssues {
        &self.known_issues
    }

    /// Classify a candidate run against an optional baseline
    ///
    /// Previous classification results are cleared first, so classifying the
    /// same data twice yields identical flags. Without a baseline every test
    /// is `Success` and no flags are set.
    ///
    /// # Errors
    /// `InvariantViolation` when a sample group has not been aggregated, a
    /// threshold override is not a finite non-negative number, or a test
    /// carries duplicate metric keys.
    pub fn classify_run(
        &self,
        candidate: &mut PerformanceTestRunResult,
        baseline: Option<&PerformanceTestRunResult>,
    ) -> Result<ClassificationSummary> {
        check_structure(candidate)?;
        reset(candidate);

        let mut summary = ClassificationSummary::default();
        let Some(baseline) = baseline else {
            return Ok(summary);
        };
        check_structure(baseline)?;

        let matches = match_metrics(&baseline.run, &candidate.run)?;
        let total: usize = candidate
            .run
            .results
            .iter()
            .map(|t| t.sample_groups.len())
            .sum();
        summary.matched = matches.len();
        summary.unmatched = total - matches.len();

        for m in matches {
            let test = &mut candidate.run.results[m.test_index];
            let test_name = test.name.as_str();
            let group = &mut test.sample_groups[m.group_index];
            let baseline_value = aggregated(m.baseline, test_name)?;
            group.baseline_value = Some(baseline_value);

            if self.config.is_ignored(&group.name) {
                debug!(test = test_name, metric = %group.name, "ignored metric");
                summary.ignored += 1;
                continue;
            }
            if group.samples.is_empty() || m.baseline.samples.is_empty() {
                debug!(test = test_name, metric = %group.name, "no samples, not classified");
                summary.skipped += 1;
                continue;
            }

            let value = aggregated(group, test_name)?;
            let threshold = group.effective_threshold(self.config.default_threshold);
            let Some(verdict) =
                compare_values(value, baseline_value, threshold, group.increase_is_better)
            else {
                debug!(test = test_name, metric = %group.name, "zero baseline, not classified");
                summary.skipped += 1;
                continue;
            };

            group.classification = match verdict {
                MetricVerdict::WithinThreshold => Classification::Neutral,
                MetricVerdict::Changed(Direction::Better) => {
                    summary.progressed += 1;
                    Classification::Progressed
                }
                MetricVerdict::Changed(Direction::Worse) => {
                    let known = self
                        .known_issues
                        .lookup(test_name, &group.name)
                        .map(str::to_string)
                        .or_else(|| group.known_issue.clone());
                    match known {
                        Some(details) => {
                            summary.regressed_known += 1;
                            Classification::RegressedKnown { details }
                        }
                        None => {
                            summary.regressed += 1;
                            Classification::Regressed
                        }
                    }
                }
            };
            debug!(
                test = test_name,
                metric = %group.name,
                value,
                baseline = baseline_value,
                threshold,
                classification = ?group.classification,
                "classified metric"
            );
        }

        for test in &mut candidate.run.results {
            let failed = test
                .sample_groups
                .iter()
                .any(|g| g.regressed() && !g.regressed_known());
            test.state = if failed {
                summary.failed_tests += 1;
                TestState::Failure
            } else {
                TestState::Success
            };
        }

        Ok(summary)
    }
}

fn aggregated(group: &SampleGroupResult, test: &str) -> Result<f64> {
    group.aggregated_value().ok_or_else(|| {
        ReportError::InvariantViolation(format!(
            "metric '{}' of test '{}' was classified before aggregation",
            group.name, test
        ))
    })
}

fn check_structure(run: &PerformanceTestRunResult) -> Result<()> {
    for test in &run.run.results {
        for group in &test.sample_groups {
            aggregated(group, &test.name)?;
            if let Some(threshold) = group.threshold {
                if !threshold.is_finite() || threshold < 0.0 {
                    return Err(ReportError::InvariantViolation(format!(
                        "metric '{}' of test '{}' has invalid threshold {}",
                        group.name, test.name, threshold
                    )));
                }
            }
        }
    }
    Ok(())
}

fn reset(run: &mut PerformanceTestRunResult) {
    for test in &mut run.run.results {
        test.state = TestState::Success;
        for group in &mut test.sample_groups {
            group.baseline_value = None;
            group.classification = Classification::Neutral;
        }
    }
}
