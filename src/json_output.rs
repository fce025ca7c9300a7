//! JSON output of classified runs
//!
//! `--output json` prints this document on stdout instead of the console
//! summary. It carries every statistic and flag the HTML report shows.

use crate::model::{
    EnvironmentDiff, PerformanceTestRunResult, SampleGroupResult, TestResult, TestState,
};
use crate::regression::{diff_ratio, SampleStatistics};
use serde::{Deserialize, Serialize};

/// Summary statistics of one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonStatistics {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub average: f64,
    pub standard_deviation: f64,
    pub sum: f64,
}

impl From<SampleStatistics> for JsonStatistics {
    fn from(s: SampleStatistics) -> Self {
        Self {
            min: s.min,
            max: s.max,
            median: s.median,
            average: s.average,
            standard_deviation: s.standard_deviation,
            sum: s.sum,
        }
    }
}

/// One metric with its classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMetric {
    pub name: String,
    /// Unit name (e.g., "Millisecond")
    pub unit: String,
    pub aggregation_type: String,
    pub increase_is_better: bool,
    /// Effective threshold (override or default)
    pub threshold: f64,
    pub aggregated_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_value: Option<f64>,
    /// Relative difference to the baseline, when defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_ratio: Option<f64>,
    /// neutral, regressed, known or progressed
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_issue_details: Option<String>,
    pub sample_count: usize,
    pub statistics: JsonStatistics,
}

/// One test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub version: String,
    /// "success" or "failure"
    pub state: String,
    pub metrics: Vec<JsonMetric>,
}

/// One run (input file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRun {
    pub result_name: String,
    pub is_baseline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_suite: Option<String>,
    #[serde(skip_serializing_if = "EnvironmentDiff::is_empty", default)]
    pub environment_diff: EnvironmentDiff,
    pub tests: Vec<JsonTest>,
}

/// Counts over all runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonSummary {
    pub runs: usize,
    pub tests: usize,
    pub failed_tests: usize,
    pub regressed: usize,
    pub regressed_known: usize,
    pub progressed: usize,
    pub exit_code: i32,
}

/// Complete JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub format: String,
    pub threshold: f64,
    pub summary: JsonSummary,
    pub runs: Vec<JsonRun>,
}

impl JsonReport {
    pub fn new(runs: &[PerformanceTestRunResult], default_threshold: f64, exit_code: i32) -> Self {
        let mut summary = JsonSummary {
            runs: runs.len(),
            exit_code,
            ..Default::default()
        };

        for test in runs.iter().flat_map(|r| r.test_results()) {
            summary.tests += 1;
            if test.state == TestState::Failure {
                summary.failed_tests += 1;
            }
            for group in &test.sample_groups {
                if group.regressed_known() {
                    summary.regressed_known += 1;
                } else if group.regressed() {
                    summary.regressed += 1;
                } else if group.progressed() {
                    summary.progressed += 1;
                }
            }
        }

        Self {
            format: "benchmark-reporter-json-v1".to_string(),
            threshold: default_threshold,
            summary,
            runs: runs
                .iter()
                .map(|run| json_run(run, default_threshold))
                .collect(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn json_run(run: &PerformanceTestRunResult, default_threshold: f64) -> JsonRun {
    JsonRun {
        result_name: run.result_name.clone(),
        is_baseline: run.is_baseline,
        source: run.source.as_ref().map(|p| p.display().to_string()),
        test_suite: run.run.test_suite.clone(),
        environment_diff: run.environment_diff.clone(),
        tests: run
            .test_results()
            .iter()
            .map(|t| json_test(t, default_threshold))
            .collect(),
    }
}

fn json_test(test: &TestResult, default_threshold: f64) -> JsonTest {
    JsonTest {
        name: test.name.clone(),
        version: test.version.clone(),
        state: match test.state {
            TestState::Success => "success",
            TestState::Failure => "failure",
        }
        .to_string(),
        metrics: test
            .sample_groups
            .iter()
            .map(|g| json_metric(g, default_threshold))
            .collect(),
    }
}

fn json_metric(group: &SampleGroupResult, default_threshold: f64) -> JsonMetric {
    let statistics = group
        .statistics
        .unwrap_or_else(|| SampleStatistics::from_samples(&group.samples));
    let aggregated_value = statistics.value_of(group.aggregation_type);

    JsonMetric {
        name: group.name.clone(),
        unit: group.unit.to_string(),
        aggregation_type: group.aggregation_type.to_string(),
        increase_is_better: group.increase_is_better,
        threshold: group.effective_threshold(default_threshold),
        aggregated_value,
        baseline_value: group.baseline_value,
        diff_ratio: group
            .baseline_value
            .and_then(|b| diff_ratio(aggregated_value, b)),
        status: group.classification.label().to_string(),
        known_issue_details: group.known_issue_details().map(str::to_string),
        sample_count: group.samples.len(),
        statistics: statistics.into(),
    }
}
