//! Schema version 1 (performance testing package before 2.0)
//!
//! Sample groups nest their settings in a `Definition` object and tests use
//! `TestName`/`TestVersion`/`TestCategories`. Run metadata sections are
//! `EditorVersion`, `BuildSettings`, `ScreenSettings`, `QualitySettings`,
//! `PlayerSettings` and `PlayerSystemInfo`.

use super::json::decode;
use super::{
    parse_aggregation, parse_threshold, parse_unit, required_name, validate_test, EnumValue,
    RunInfo, Schema,
};
use crate::error::{ReportError, Result};
use crate::model::{PerformanceTestRun, SampleGroupResult, SchemaVersion, TestResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RunDocument {
    #[serde(default)]
    test_suite: Option<String>,
    #[serde(default)]
    results: Option<Vec<TestResultDocument>>,
    #[serde(flatten)]
    metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TestResultDocument {
    #[serde(default)]
    test_name: Option<String>,
    #[serde(default)]
    test_version: Option<String>,
    #[serde(default)]
    test_categories: Option<Vec<String>>,
    #[serde(default)]
    sample_groups: Option<Vec<SampleGroupDocument>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SampleGroupDocument {
    #[serde(default)]
    definition: Option<DefinitionDocument>,
    #[serde(default)]
    samples: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DefinitionDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sample_unit: Option<EnumValue>,
    #[serde(default)]
    aggregation_type: Option<EnumValue>,
    #[serde(default)]
    threshold: Option<f64>,
    #[serde(default)]
    increase_is_better: Option<bool>,
    #[serde(default)]
    contains_known_issue: Option<bool>,
    #[serde(default)]
    known_issue_details: Option<String>,
}

/// Version 1 field naming
pub(crate) struct V1;

impl Schema for V1 {
    const VERSION: SchemaVersion = SchemaVersion::V1;

    fn run(json: &str) -> Result<PerformanceTestRun> {
        let doc: RunDocument = decode(json)?;
        let results = doc.results.ok_or_else(|| {
            ReportError::SchemaValidation("run document has no Results".to_string())
        })?;
        Ok(PerformanceTestRun {
            schema_version: Self::VERSION,
            test_suite: doc.test_suite,
            metadata: doc.metadata,
            results: results
                .into_iter()
                .map(TestResultDocument::into_test_result)
                .collect::<Result<_>>()?,
        })
    }

    fn test_result(json: &str) -> Result<TestResult> {
        decode::<TestResultDocument>(json)?.into_test_result()
    }

    fn run_info(json: &str) -> Result<RunInfo> {
        let doc: RunDocument = decode(json)?;
        Ok(RunInfo {
            test_suite: doc.test_suite,
            metadata: doc.metadata,
        })
    }
}

impl TestResultDocument {
    fn into_test_result(self) -> Result<TestResult> {
        let name = required_name(self.test_name, "test result")?;
        let sample_groups = self
            .sample_groups
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.into_sample_group(&name))
            .collect::<Result<Vec<_>>>()?;

        let test = TestResult {
            version: self.test_version.unwrap_or_default(),
            categories: self.test_categories.unwrap_or_default(),
            ..TestResult::new(name, sample_groups)
        };
        validate_test(&test)?;
        Ok(test)
    }
}

impl SampleGroupDocument {
    fn into_sample_group(self, test: &str) -> Result<SampleGroupResult> {
        let definition = self.definition.ok_or_else(|| {
            ReportError::SchemaValidation(format!(
                "sample group of test '{}' has no Definition",
                test
            ))
        })?;
        let name = required_name(definition.name, &format!("sample group of test '{}'", test))?;
        let context = format!("metric '{}' of test '{}'", name, test);
        let unit = parse_unit(definition.sample_unit.as_ref(), &context)?;
        let aggregation = parse_aggregation(definition.aggregation_type.as_ref(), &context)?;

        let mut group =
            SampleGroupResult::new(name, unit, aggregation, self.samples.unwrap_or_default());
        group.increase_is_better = definition.increase_is_better.unwrap_or(false);
        group.threshold = parse_threshold(definition.threshold, &context)?;
        if definition.contains_known_issue.unwrap_or(false) {
            group.known_issue = Some(definition.known_issue_details.unwrap_or_default());
        }
        Ok(group)
    }
}
