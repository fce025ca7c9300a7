//! CSV export of per-metric statistics
//!
//! One row per (test, run, metric). Rows are grouped by test name in order
//! of first appearance, then follow the assembled run order, so the same
//! inputs always produce the same file.

use crate::model::{PerformanceTestRunResult, SampleGroupResult, TestResult};
use crate::regression::SampleStatistics;
use std::collections::HashMap;

const HEADER: [&str; 12] = [
    "Test Name",
    "Run Name",
    "Version",
    "Sample Group Name",
    "Unit",
    "Increase Is Better",
    "Min",
    "Max",
    "Median",
    "Average",
    "Standard Deviation",
    "Sum",
];

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvReport<'a> {
    // test name -> (run, test) in run order
    groups: Vec<(&'a str, Vec<(&'a PerformanceTestRunResult, &'a TestResult)>)>,
}

impl<'a> CsvReport<'a> {
    /// Group the tests of the assembled runs by name
    pub fn new(runs: &'a [PerformanceTestRunResult]) -> Self {
        let mut groups: Vec<(&str, Vec<_>)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for run in runs {
            for test in run.test_results() {
                let index = *positions.entry(test.name.as_str()).or_insert_with(|| {
                    groups.push((test.name.as_str(), Vec::new()));
                    groups.len() - 1
                });
                groups[index].1.push((run, test));
            }
        }

        Self { groups }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(
        run: &PerformanceTestRunResult,
        test: &TestResult,
        group: &SampleGroupResult,
    ) -> String {
        let stats = group.statistics.unwrap_or_else(|| SampleStatistics::from_samples(&group.samples));
        let increase_is_better = if group.increase_is_better { "True" } else { "False" };

        [
            Self::escape_field(&test.name),
            Self::escape_field(&run.result_name),
            Self::escape_field(&test.version),
            Self::escape_field(&group.name),
            group.unit.to_string(),
            increase_is_better.to_string(),
            stats.min.to_string(),
            stats.max.to_string(),
            stats.median.to_string(),
            stats.average.to_string(),
            stats.standard_deviation.to_string(),
            stats.sum.to_string(),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&HEADER.join(","));
        output.push('\n');

        for (_, entries) in &self.groups {
            for (run, test) in entries {
                for group in &test.sample_groups {
                    output.push_str(&Self::format_row(run, test, group));
                    output.push('\n');
                }
            }
        }

        output
    }
}
