//! Console summary of classified runs
//!
//! Three sections, each only when it has content: progressions and known
//! regressions of passing tests, then regressions that fail their test. Every metric block
//! shows the headline and baseline values, the threshold and the relative
//! difference, both as percentages.

use crate::model::{PerformanceTestRunResult, SampleGroupResult, TestResult, TestState};
use crate::regression::diff_ratio;

const RULE: &str = "-------------------------------------";

/// Exit code: 1 when failing on baseline and any test is in Failure state
pub fn exit_code(runs: &[PerformanceTestRunResult], fail_on_baseline: bool) -> i32 {
    if fail_on_baseline && runs.iter().any(PerformanceTestRunResult::has_failures) {
        1
    } else {
        0
    }
}

/// Console summary text, ending with the `Finished with Result` line
pub fn render_summary(
    runs: &[PerformanceTestRunResult],
    default_threshold: f64,
    fail_on_baseline: bool,
) -> String {
    let mut out = String::new();

    out.push_str(&render_section(
        runs,
        default_threshold,
        &[
            "Info: One or more performance test metric aggregations is out of threshold from the baseline value. PROGRESSIONS!",
            " Performance tests with Progressed metrics",
        ],
        |test| test.state == TestState::Success,
        SampleGroupResult::progressed,
        "New Value     ",
    ));
    out.push_str(&render_section(
        runs,
        default_threshold,
        &[
            "Info: One or more performance test metric aggregations is out of threshold from the baseline value. KNOWN REGRESSIONS!",
            " Performance tests with Known Regressions metrics",
        ],
        |test| test.state == TestState::Success,
        SampleGroupResult::regressed_known,
        "New Value     ",
    ));
    out.push_str(&render_section(
        runs,
        default_threshold,
        &[
            "FAILURE: One or more performance test metric aggregations is out of threshold from the baseline value. REGRESSIONS!",
            " Performance tests with failed metrics",
        ],
        |test| test.state == TestState::Failure,
        |group| group.regressed() && !group.regressed_known(),
        "Failed Value  ",
    ));

    out.push_str(&format!(
        "Finished with Result {}\n",
        exit_code(runs, fail_on_baseline)
    ));
    out
}

fn render_section(
    runs: &[PerformanceTestRunResult],
    default_threshold: f64,
    header: &[&str; 2],
    include_test: impl Fn(&TestResult) -> bool,
    include_metric: impl Fn(&SampleGroupResult) -> bool,
    value_label: &str,
) -> String {
    let mut out = String::new();

    let tests = runs
        .iter()
        .flat_map(|run| run.test_results())
        .filter(|test| include_test(*test) && test.sample_groups.iter().any(&include_metric));

    for test in tests {
        if out.is_empty() {
            out.push_str(&format!("{}\n{}\n{}\n{}\n", header[0], RULE, header[1], RULE));
        }
        out.push_str(&format!("\t{}\n", test.name));
        for group in test.sample_groups.iter().filter(|g| include_metric(*g)) {
            out.push_str(&render_metric(group, default_threshold, value_label));
        }
        out.push('\n');
    }

    out
}

fn render_metric(group: &SampleGroupResult, default_threshold: f64, value_label: &str) -> String {
    let value = group.aggregated_value().unwrap_or_default();
    let baseline = group.baseline_value.unwrap_or_default();
    let threshold = group.effective_threshold(default_threshold) * 100.0;

    let mut out = String::new();
    out.push_str("\t----\n");
    out.push_str(&format!("\tMetric        : {}\n", group.name));
    out.push_str(&format!("\tAggregation   : {}\n", group.aggregation_type));
    out.push_str(&format!("\t{}: {:8.2}\n", value_label, value));
    out.push_str(&format!("\tBaseline Value: {:8.2}\n", baseline));
    out.push_str(&format!("\tThreshold %   : {:8.2}\n", threshold));
    match diff_ratio(value, baseline) {
        Some(ratio) => out.push_str(&format!("\tActual Diff % : {:8.2}\n", ratio * 100.0)),
        None => out.push_str("\tActual Diff % :      n/a\n"),
    }
    if let Some(details) = group.known_issue_details() {
        out.push_str(&format!("\tKnown Issue   : {}\n", details));
    }
    out
}
