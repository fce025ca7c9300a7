//! Schema normalization: result documents into the canonical run model
//!
//! Two encodings (JSON, NUnit XML) times two schema versions (V1, V2) give
//! four [`Normalizer`] variants, chosen by an explicit tag at load time. Each
//! produces the same [`PerformanceTestRun`] shape.
//!
//! # Example
//!
//! ```
//! use benchmark_reporter::model::SchemaVersion;
//! use benchmark_reporter::normalize::{FileFormat, Normalizer};
//!
//! let json = r#"{"Results":[{"Name":"Boot","SampleGroups":[
//!     {"Name":"FrameTime","Unit":2,"Samples":[16.0,17.0]}]}]}"#;
//! let run = Normalizer::new(FileFormat::Json, SchemaVersion::V2)
//!     .normalize(json.as_bytes())
//!     .unwrap();
//! assert_eq!(run.results[0].name, "Boot");
//! ```

mod json;
mod v1;
mod v2;
mod xml;

use crate::error::{ReportError, Result};
use crate::model::{AggregationType, PerformanceTestRun, SampleUnit, SchemaVersion, TestResult};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

pub use json::strip_array_wrapper;

/// Encoding of the result files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FileFormat {
    /// NUnit XML written by the test runner (default)
    #[default]
    Xml,
    /// Raw performance test run JSON
    Json,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xml => "xml",
            FileFormat::Json => "json",
        }
    }

    /// Whether `path` has this format's extension (ASCII case-insensitive)
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()))
    }
}

/// One normalizer per (encoding, schema version) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    JsonV1,
    JsonV2,
    XmlV1,
    XmlV2,
}

impl Normalizer {
    pub fn new(format: FileFormat, version: SchemaVersion) -> Self {
        match (format, version) {
            (FileFormat::Json, SchemaVersion::V1) => Normalizer::JsonV1,
            (FileFormat::Json, SchemaVersion::V2) => Normalizer::JsonV2,
            (FileFormat::Xml, SchemaVersion::V1) => Normalizer::XmlV1,
            (FileFormat::Xml, SchemaVersion::V2) => Normalizer::XmlV2,
        }
    }

    pub fn format(&self) -> FileFormat {
        match self {
            Normalizer::JsonV1 | Normalizer::JsonV2 => FileFormat::Json,
            Normalizer::XmlV1 | Normalizer::XmlV2 => FileFormat::Xml,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        match self {
            Normalizer::JsonV1 | Normalizer::XmlV1 => SchemaVersion::V1,
            Normalizer::JsonV2 | Normalizer::XmlV2 => SchemaVersion::V2,
        }
    }

    /// Decode raw file bytes into a canonical run
    ///
    /// # Errors
    /// `MalformedInput` for undecodable content, `SchemaValidation` when the
    /// decoded document lacks required structure.
    pub fn normalize(&self, bytes: &[u8]) -> Result<PerformanceTestRun> {
        let text = decode_text(bytes)?;
        let run = match self {
            Normalizer::JsonV1 => json::parse::<v1::V1>(text)?,
            Normalizer::JsonV2 => json::parse::<v2::V2>(text)?,
            Normalizer::XmlV1 => xml::parse::<v1::V1>(text)?,
            Normalizer::XmlV2 => xml::parse::<v2::V2>(text)?,
        };
        if run.results.is_empty() {
            return Err(ReportError::SchemaValidation(
                "document contains no performance test results".to_string(),
            ));
        }
        Ok(run)
    }

    /// Read and normalize one file
    pub fn load(&self, path: &Path) -> Result<PerformanceTestRun> {
        let bytes = fs::read(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.normalize(&bytes)
    }
}

/// Run-level fields shared by both schema versions
#[derive(Debug, Default)]
pub(crate) struct RunInfo {
    pub test_suite: Option<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Field naming of one schema version
pub(crate) trait Schema {
    const VERSION: SchemaVersion;

    /// Whole run document (metadata plus results)
    fn run(json: &str) -> Result<PerformanceTestRun>;

    /// One test result, as embedded in XML output
    fn test_result(json: &str) -> Result<TestResult>;

    /// Run metadata without results, as embedded in XML output
    fn run_info(json: &str) -> Result<RunInfo>;
}

fn decode_text(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ReportError::MalformedInput(format!("content is not UTF-8: {}", e)))?;
    Ok(text.trim_start_matches('\u{feff}'))
}

/// Map a serde_json failure onto the error kinds: syntax is malformed input,
/// a well-formed document of the wrong shape is a schema error.
pub(crate) fn json_error(e: serde_json::Error) -> ReportError {
    match e.classify() {
        serde_json::error::Category::Data => ReportError::SchemaValidation(e.to_string()),
        _ => ReportError::MalformedInput(e.to_string()),
    }
}

/// Enumerations are serialized either as integer indices or as names
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum EnumValue {
    Index(u64),
    Name(String),
}

pub(crate) fn parse_unit(value: Option<&EnumValue>, context: &str) -> Result<SampleUnit> {
    let unit = match value {
        None => Some(SampleUnit::Undefined),
        Some(EnumValue::Index(i)) => SampleUnit::from_index(*i),
        Some(EnumValue::Name(name)) => SampleUnit::from_name(name),
    };
    unit.ok_or_else(|| {
        ReportError::SchemaValidation(format!("{}: unrecognized unit {:?}", context, value))
    })
}

/// Aggregation indices follow the runner's order: Average, Min, Max, Median.
/// Percentile (index 4) has no canonical counterpart.
pub(crate) fn parse_aggregation(value: Option<&EnumValue>, context: &str) -> Result<AggregationType> {
    let aggregation = match value {
        None => Some(AggregationType::Median),
        Some(EnumValue::Index(0)) => Some(AggregationType::Average),
        Some(EnumValue::Index(1)) => Some(AggregationType::Min),
        Some(EnumValue::Index(2)) => Some(AggregationType::Max),
        Some(EnumValue::Index(3)) => Some(AggregationType::Median),
        Some(EnumValue::Index(_)) => None,
        Some(EnumValue::Name(name)) => AggregationType::from_name(name),
    };
    aggregation.ok_or_else(|| {
        ReportError::SchemaValidation(format!(
            "{}: unsupported aggregation type {:?}",
            context, value
        ))
    })
}

/// Per-metric threshold overrides must be finite and non-negative
pub(crate) fn parse_threshold(value: Option<f64>, context: &str) -> Result<Option<f64>> {
    match value {
        Some(t) if !t.is_finite() || t < 0.0 => Err(ReportError::SchemaValidation(format!(
            "{}: invalid threshold {}",
            context, t
        ))),
        _ => Ok(value),
    }
}

/// Name must be present and non-empty
pub(crate) fn required_name(name: Option<String>, what: &str) -> Result<String> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n),
        _ => Err(ReportError::SchemaValidation(format!("{} has no name", what))),
    }
}

/// Structural checks shared by both schema versions
pub(crate) fn validate_test(test: &TestResult) -> Result<()> {
    if test.sample_groups.is_empty() {
        return Err(ReportError::SchemaValidation(format!(
            "test '{}' has no sample groups",
            test.name
        )));
    }
    let mut seen = HashSet::new();
    for group in &test.sample_groups {
        if !seen.insert(test.key_of(group)) {
            return Err(ReportError::SchemaValidation(format!(
                "test '{}' has duplicate metric '{}' ({})",
                test.name, group.name, group.unit
            )));
        }
    }
    Ok(())
}
