//! Environment diff across runs
//!
//! Marks the metadata fields (player, editor, build settings, ...) whose
//! values are not the same in every assembled run, so the report can flag
//! results produced on different setups. Only object-valued sections are
//! inspected, one level deep.

use crate::model::{EnvironmentDiff, PerformanceTestRunResult};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Entity kind (metadata section) -> field names left out of the diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExclusions {
    kinds: BTreeMap<String, BTreeSet<String>>,
}

impl Default for FieldExclusions {
    /// Fields that change on every build and say nothing about the setup
    fn default() -> Self {
        let mut exclusions = Self::empty();
        exclusions.set("EditorVersion", ["DateSeconds", "RevisionValue"]);
        exclusions.set("BuildSettings", ["DevelopmentPlayer"]);
        exclusions.set("PlayerSystemInfo", ["XrModel"]);
        exclusions.set(
            "PlayerSettings",
            [
                "MtRendering",
                "GraphicsJobs",
                "VrSupported",
                "AndroidMinimumSdkVersion",
                "AndroidTargetSdkVersion",
            ],
        );
        exclusions
    }
}

impl FieldExclusions {
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Replace the excluded fields of one entity kind
    pub fn set<K, I, S>(&mut self, kind: K, fields: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds
            .insert(kind.into(), fields.into_iter().map(Into::into).collect());
    }

    pub fn is_excluded(&self, kind: &str, field: &str) -> bool {
        self.kinds
            .get(kind)
            .is_some_and(|fields| fields.contains(field))
    }
}

/// Fill `environment_diff` of every run
///
/// A field differs when at least two runs disagree on its value; a run
/// without the field counts as `null`. Differing fields are recorded on
/// every run that carries the section. Fewer than two runs never differ.
pub fn diff_environments(runs: &mut [PerformanceTestRunResult], exclusions: &FieldExclusions) {
    let differing = differing_fields(runs, exclusions);

    for run in runs.iter_mut() {
        let mut diff = EnvironmentDiff::new();
        for (section, fields) in &differing {
            if run.run.metadata.get(section).is_some_and(Value::is_object) {
                diff.insert(section.clone(), fields.clone());
            }
        }
        run.environment_diff = diff;
    }
}

fn differing_fields(
    runs: &[PerformanceTestRunResult],
    exclusions: &FieldExclusions,
) -> EnvironmentDiff {
    let mut differing = EnvironmentDiff::new();
    if runs.len() < 2 {
        return differing;
    }

    // section -> field names seen in any run
    let mut candidates: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for run in runs {
        for (section, value) in &run.run.metadata {
            if let Value::Object(fields) = value {
                candidates
                    .entry(section.as_str())
                    .or_default()
                    .extend(fields.keys().map(String::as_str));
            }
        }
    }

    for (section, fields) in candidates {
        for field in fields {
            if exclusions.is_excluded(section, field) {
                continue;
            }
            let first = field_value(&runs[0], section, field);
            if runs[1..]
                .iter()
                .any(|run| field_value(run, section, field) != first)
            {
                debug!("Environment field {}.{} differs across runs", section, field);
                differing
                    .entry(section.to_string())
                    .or_default()
                    .insert(field.to_string());
            }
        }
    }

    differing
}

fn field_value<'a>(run: &'a PerformanceTestRunResult, section: &str, field: &str) -> &'a Value {
    run.run
        .metadata
        .get(section)
        .and_then(|s| s.get(field))
        .unwrap_or(&Value::Null)
}
