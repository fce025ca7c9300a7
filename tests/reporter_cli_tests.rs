// Integration tests for the benchmark-reporter binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use utils::{write_file, write_json_run, write_xml_run};

const BASELINE: &[utils::Metric<'static>] = &[
    ("Rendering.Boot", "FrameTime", 2, &[16.0, 16.0]),
    ("Level.Load", "LoadTime", 3, &[2.0]),
];

#[test]
fn test_help_lists_options() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--results"))
        .stdout(predicate::str::contains("--baseline"))
        .stdout(predicate::str::contains("--fail-on-baseline"));
}

#[test]
fn test_results_required() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.assert().failure();
}

#[test]
fn test_regression_fails_with_fail_on_baseline() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "baseline/base.json", BASELINE);
    write_json_run(
        dir.path(),
        "runs/nightly.json",
        &[
            ("Rendering.Boot", "FrameTime", 2, &[17.5, 17.5]),
            ("Level.Load", "LoadTime", 3, &[2.0]),
        ],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.current_dir(dir.path())
        .args(["--format", "json", "--fail-on-baseline", "--no-html"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(dir.path().join("runs"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("REGRESSIONS!"))
        .stdout(predicate::str::contains("Metric        : FrameTime"))
        .stdout(predicate::str::contains("Actual Diff % :     9.38"))
        .stdout(predicate::str::contains("Finished with Result 1"));
}

#[test]
fn test_regression_without_fail_flag_exits_zero() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[17.5])],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::str::contains("REGRESSIONS!"))
        .stdout(predicate::str::contains("Finished with Result 0"));
}

#[test]
fn test_within_threshold_is_quiet() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[16.5])],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html", "--fail-on-baseline"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::eq("Finished with Result 0\n"));
}

#[test]
fn test_known_issue_does_not_fail() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[17.5])],
    );
    let issues = write_file(
        dir.path(),
        "known.toml",
        "[[known_issue]]\ntest = \"Rendering.Boot\"\nmetric = \"FrameTime\"\ndetails = \"case 1234\"\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html", "--fail-on-baseline"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .arg("--known-issues")
        .arg(&issues)
        .assert()
        .success()
        .stdout(predicate::str::contains("KNOWN REGRESSIONS!"))
        .stdout(predicate::str::contains("Known Issue   : case 1234"))
        .stdout(predicate::str::contains("FAILURE").not());
}

#[test]
fn test_ignored_metric_is_not_classified() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[30.0])],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html", "--fail-on-baseline"])
        .args(["--ignore", "FrameTime;GC.Alloc"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .assert()
        .success()
        .stdout(predicate::eq("Finished with Result 0\n"));
}

#[test]
fn test_threshold_flag() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[17.5])],
    );

    // 9.4% is within a 10% threshold
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html", "--fail-on-baseline", "-t", "0.1"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .assert()
        .success();
}

#[test]
fn test_xml_input() {
    let dir = TempDir::new().unwrap();
    let base = write_xml_run(dir.path(), "base.xml", BASELINE);
    write_xml_run(
        dir.path(),
        "runs/faster.xml",
        &[("Rendering.Boot", "FrameTime", 2, &[14.0])],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.arg("--no-html")
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(dir.path().join("runs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("PROGRESSIONS!"))
        .stdout(predicate::str::contains("Actual Diff % :    12.50"));
}

#[test]
fn test_malformed_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    write_json_run(
        dir.path(),
        "runs/good.json",
        &[("Rendering.Boot", "FrameTime", 2, &[16.0])],
    );
    write_file(dir.path(), "runs/broken.json", "{ \"Results\": [");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html", "--output", "json"])
        .arg("--results")
        .arg(dir.path().join("runs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"result_name\": \"good\""))
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_invalid_threshold_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(
        dir.path(),
        "base.json",
        &[("Boot", "FrameTime", 2, &[16.0])],
    );
    write_json_run(
        dir.path(),
        "runs/a_good.json",
        &[("Boot", "FrameTime", 2, &[17.5])],
    );
    write_file(
        dir.path(),
        "runs/b_bad.json",
        r#"{"Results":[{"Name":"Boot","SampleGroups":[
            {"Name":"FrameTime","Unit":2,"Threshold":-0.1,"Samples":[17.5]}]}]}"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(dir.path().join("runs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric        : FrameTime"))
        .stdout(predicate::str::contains("Finished with Result 0"))
        .stderr(predicate::str::contains("b_bad.json"))
        .stderr(predicate::str::contains("invalid threshold"));
}

#[test]
fn test_no_usable_files_fails() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "runs/broken.json", "not json at all");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html"])
        .arg("--results")
        .arg(dir.path().join("runs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No usable json result files"));
}

#[test]
fn test_missing_results_path_fails() {
    let dir = TempDir::new().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html"])
        .arg("--results")
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_multiple_baselines_fail() {
    let dir = TempDir::new().unwrap();
    write_json_run(dir.path(), "baseline/one.json", BASELINE);
    write_json_run(dir.path(), "baseline/two.json", BASELINE);
    let run = write_json_run(dir.path(), "nightly.json", BASELINE);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html"])
        .arg("--baseline")
        .arg(dir.path().join("baseline"))
        .arg("--results")
        .arg(&run)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one is allowed"));
}

#[test]
fn test_baseline_not_loaded_as_candidate() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "runs/base.json", BASELINE);
    write_json_run(dir.path(), "runs/nightly.json", BASELINE);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    let output = cmd
        .args(["--format", "json", "--no-html", "--output", "json"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(dir.path().join("runs"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let runs = report["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["result_name"], "base");
    assert_eq!(runs[0]["is_baseline"], true);
    assert_eq!(runs[1]["result_name"], "nightly");
}

#[test]
fn test_html_and_csv_written() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    write_json_run(
        dir.path(),
        "runs/b_run.json",
        &[("Rendering.Boot", "FrameTime", 2, &[17.0])],
    );
    write_json_run(
        dir.path(),
        "runs/a_run.json",
        &[("Rendering.Boot", "FrameTime", 2, &[15.0])],
    );
    let reports = dir.path().join("reports");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--report-csv"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(dir.path().join("runs"))
        .arg("--report-dir")
        .arg(&reports)
        .assert()
        .success();

    let html = fs::read_to_string(reports.join("performance_benchmark_report.html")).unwrap();
    assert!(html.contains("<h1>Performance Benchmark Report</h1>"));
    assert!(html.contains("(baseline)"));

    let csv = fs::read_to_string(reports.join("performance_benchmark_report.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Test Name,Run Name,Version,Sample Group Name,Unit,Increase Is Better,Min,Max,Median,Average,Standard Deviation,Sum"
    );
    assert!(lines[1].starts_with("Rendering.Boot,base,1,FrameTime,Millisecond,False,"));
    assert!(lines[2].starts_with("Rendering.Boot,a_run,"));
    assert!(lines[3].starts_with("Rendering.Boot,b_run,"));
    assert!(lines[4].starts_with("Level.Load,base,"));
}

#[test]
fn test_config_file_overridden_by_flags() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[17.5])],
    );
    let config = write_file(
        dir.path(),
        "reporter.toml",
        "threshold = 0.2\nfail_on_baseline = true\n",
    );

    // file threshold hides the regression
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html"])
        .arg("--config")
        .arg(&config)
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .assert()
        .success();

    // flag threshold wins, fail_on_baseline comes from the file
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    cmd.args(["--format", "json", "--no-html", "-t", "0.05"])
        .arg("--config")
        .arg(&config)
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .assert()
        .code(1);
}

#[test]
fn test_json_output_document() {
    let dir = TempDir::new().unwrap();
    let base = write_json_run(dir.path(), "base.json", BASELINE);
    let run = write_json_run(
        dir.path(),
        "nightly.json",
        &[("Rendering.Boot", "FrameTime", 2, &[17.5])],
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("benchmark-reporter");
    let output = cmd
        .args(["--format", "json", "--no-html", "--output", "json"])
        .arg("--baseline")
        .arg(&base)
        .arg("--results")
        .arg(&run)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["format"], "benchmark-reporter-json-v1");
    assert_eq!(report["summary"]["regressed"], 1);
    assert_eq!(report["summary"]["failed_tests"], 1);
    let metric = &report["runs"][1]["tests"][0]["metrics"][0];
    assert_eq!(metric["status"], "regressed");
    assert_eq!(metric["baseline_value"], 16.0);
}
