// Baseline comparison: aggregation, matching and threshold classification
//
// Pipeline per candidate run:
// - statistics: summarize every sample group (min, max, median, average,
//   population standard deviation, sum) and pick the headline value
// - matcher: pair candidate metrics with baseline metrics by
//   (test name, metric name, unit)
// - verdict: compare headline values against the metric threshold and roll
//   the result up into the test's pass/fail state
//
// Classification is a pure function of the runs, the configuration and the
// known-issues table; nothing is kept between invocations.

mod config;
mod known_issues;
mod matcher;
mod statistics;
mod verdict;

pub use config::{parse_metric_list, ClassifierConfig, DEFAULT_THRESHOLD};
pub use known_issues::{KnownIssueEntry, KnownIssues};
pub use matcher::{match_metrics, BaselineIndex, MetricMatch};
pub use statistics::{aggregate, aggregate_group, aggregate_run, median, SampleStatistics};
pub use verdict::{
    compare_values, diff_ratio, direction, ClassificationSummary, Classifier, Direction,
    MetricVerdict,
};
