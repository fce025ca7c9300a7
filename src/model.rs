//! Canonical in-memory model for performance test runs
//!
//! Both schema versions and both file encodings normalize into these types.
//! Statistics and classification fields start empty and are filled by the
//! aggregation and classification passes in `regression`.

use crate::regression::SampleStatistics;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Schema version of the result documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
}

impl TryFrom<u8> for SchemaVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            other => Err(format!("unsupported data version {} (expected 1 or 2)", other)),
        }
    }
}

/// Which aggregation produces a metric's headline value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationType {
    Min,
    Max,
    Median,
    Average,
    Sum,
}

impl AggregationType {
    /// Look up an aggregation by its name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        [
            AggregationType::Min,
            AggregationType::Max,
            AggregationType::Median,
            AggregationType::Average,
            AggregationType::Sum,
        ]
        .into_iter()
        .find(|a| a.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
            AggregationType::Median => "Median",
            AggregationType::Average => "Average",
            AggregationType::Sum => "Sum",
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement unit of a sample group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Undefined,
}

impl SampleUnit {
    /// Units in the order the test runner serializes them as integers
    pub const ORDERED: [SampleUnit; 9] = [
        SampleUnit::Nanosecond,
        SampleUnit::Microsecond,
        SampleUnit::Millisecond,
        SampleUnit::Second,
        SampleUnit::Byte,
        SampleUnit::Kilobyte,
        SampleUnit::Megabyte,
        SampleUnit::Gigabyte,
        SampleUnit::Undefined,
    ];

    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ORDERED.get(i).copied())
    }

    /// Look up a unit by name; the V1 spelling `None` maps to `Undefined`
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("none") {
            return Some(SampleUnit::Undefined);
        }
        Self::ORDERED
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleUnit::Nanosecond => "Nanosecond",
            SampleUnit::Microsecond => "Microsecond",
            SampleUnit::Millisecond => "Millisecond",
            SampleUnit::Second => "Second",
            SampleUnit::Byte => "Byte",
            SampleUnit::Kilobyte => "Kilobyte",
            SampleUnit::Megabyte => "Megabyte",
            SampleUnit::Gigabyte => "Gigabyte",
            SampleUnit::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for SampleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail state of a test case, derived from its metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestState {
    #[default]
    Success,
    Failure,
}

/// Outcome of comparing one metric against its baseline
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Classification {
    /// Within threshold, unmatched, ignored or otherwise not classified
    #[default]
    Neutral,
    /// Worse than baseline beyond the threshold
    Regressed,
    /// Worse beyond the threshold but accepted as a known issue
    RegressedKnown { details: String },
    /// Better than baseline beyond the threshold
    Progressed,
}

impl Classification {
    /// Short lowercase label used by the JSON and HTML reports
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Neutral => "neutral",
            Classification::Regressed => "regressed",
            Classification::RegressedKnown { .. } => "known",
            Classification::Progressed => "progressed",
        }
    }
}

/// One measured metric within a test
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroupResult {
    pub name: String,
    pub unit: SampleUnit,
    pub aggregation_type: AggregationType,
    pub increase_is_better: bool,
    /// Raw samples in recorded order, may be empty
    pub samples: Vec<f64>,
    /// Per-metric threshold override; the classifier default applies when unset
    pub threshold: Option<f64>,
    /// Known-issue annotation carried by the result document itself
    pub known_issue: Option<String>,
    /// Filled by the aggregation pass
    pub statistics: Option<SampleStatistics>,
    /// Baseline headline value, set when a baseline counterpart exists
    pub baseline_value: Option<f64>,
    pub classification: Classification,
}

impl SampleGroupResult {
    pub fn new(
        name: impl Into<String>,
        unit: SampleUnit,
        aggregation_type: AggregationType,
        samples: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            unit,
            aggregation_type,
            increase_is_better: false,
            samples,
            threshold: None,
            known_issue: None,
            statistics: None,
            baseline_value: None,
            classification: Classification::Neutral,
        }
    }

    /// Headline value selected by `aggregation_type`, once aggregated
    pub fn aggregated_value(&self) -> Option<f64> {
        self.statistics
            .as_ref()
            .map(|s| s.value_of(self.aggregation_type))
    }

    pub fn effective_threshold(&self, default_threshold: f64) -> f64 {
        self.threshold.unwrap_or(default_threshold)
    }

    pub fn regressed(&self) -> bool {
        matches!(
            self.classification,
            Classification::Regressed | Classification::RegressedKnown { .. }
        )
    }

    pub fn regressed_known(&self) -> bool {
        matches!(self.classification, Classification::RegressedKnown { .. })
    }

    pub fn progressed(&self) -> bool {
        self.classification == Classification::Progressed
    }

    pub fn known_issue_details(&self) -> Option<&str> {
        match &self.classification {
            Classification::RegressedKnown { details } => Some(details),
            _ => None,
        }
    }
}

/// Identity of a metric across runs: (test name, metric name, unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaselineKey<'a> {
    pub test: &'a str,
    pub metric: &'a str,
    pub unit: SampleUnit,
}

/// One test case within a run
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub name: String,
    pub version: String,
    pub categories: Vec<String>,
    pub sample_groups: Vec<SampleGroupResult>,
    pub state: TestState,
}

impl TestResult {
    pub fn new(name: impl Into<String>, sample_groups: Vec<SampleGroupResult>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            categories: Vec::new(),
            sample_groups,
            state: TestState::Success,
        }
    }

    pub fn key_of<'a>(&'a self, group: &'a SampleGroupResult) -> BaselineKey<'a> {
        BaselineKey {
            test: &self.name,
            metric: &group.name,
            unit: group.unit,
        }
    }

    /// Find the sample group sharing `group`'s metric name and unit
    pub fn find_counterpart(&self, group: &SampleGroupResult) -> Option<&SampleGroupResult> {
        self.sample_groups
            .iter()
            .find(|g| g.name == group.name && g.unit == group.unit)
    }
}

/// One parsed input file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceTestRun {
    pub schema_version: SchemaVersion,
    pub test_suite: Option<String>,
    /// Player/editor/build sections, passed through uninterpreted
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub results: Vec<TestResult>,
}

impl PerformanceTestRun {
    pub fn find_test(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|t| t.name == name)
    }
}

/// Metadata section name -> field names that differ from the other runs
pub type EnvironmentDiff = BTreeMap<String, BTreeSet<String>>;

/// A normalized run ready for comparison and reporting
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceTestRunResult {
    pub result_name: String,
    pub is_baseline: bool,
    pub source: Option<PathBuf>,
    pub run: PerformanceTestRun,
    /// Filled by the metadata diff pass
    pub environment_diff: EnvironmentDiff,
}

impl PerformanceTestRunResult {
    pub fn new(result_name: impl Into<String>, run: PerformanceTestRun) -> Self {
        Self {
            result_name: result_name.into(),
            is_baseline: false,
            source: None,
            run,
            environment_diff: EnvironmentDiff::new(),
        }
    }

    pub fn baseline(result_name: impl Into<String>, run: PerformanceTestRun) -> Self {
        Self {
            is_baseline: true,
            ..Self::new(result_name, run)
        }
    }

    pub fn test_results(&self) -> &[TestResult] {
        &self.run.results
    }

    pub fn has_failures(&self) -> bool {
        self.run.results.iter().any(|t| t.state == TestState::Failure)
    }
}
