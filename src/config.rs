//! Reporter configuration file
//!
//! Optional TOML file with the classifier defaults, known issues and the
//! metadata diff exclusions. Command-line flags override the file.
//!
//! ```toml
//! threshold = 0.1
//! ignored_metrics = ["GC.Alloc", "Loading"]
//! fail_on_baseline = true
//!
//! [[known_issue]]
//! test = "Rendering.Boot"
//! metric = "FrameTime"
//! details = "Shader warmup moved to first frame"
//!
//! [metadata_exclusions]
//! PlayerSettings = ["MtRendering"]
//! ```

use crate::error::{ReportError, Result};
use crate::metadata::FieldExclusions;
use crate::regression::{ClassifierConfig, KnownIssueEntry, KnownIssues};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Settings read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub ignored_metrics: Vec<String>,
    #[serde(default)]
    pub fail_on_baseline: Option<bool>,
    #[serde(default)]
    pub known_issue: Vec<KnownIssueEntry>,
    /// Entity kind -> field names; replaces the default exclusions for that kind
    #[serde(default)]
    pub metadata_exclusions: BTreeMap<String, BTreeSet<String>>,
}

impl ReporterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| {
            ReportError::Configuration(format!("{}: {}", path.display(), e))
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ReportError::Configuration(e.to_string()))
    }

    /// Classifier settings from the file, before command-line overrides
    pub fn classifier_config(&self) -> ClassifierConfig {
        let mut config = ClassifierConfig::default().with_ignored(self.ignored_metrics.iter());
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        config
    }

    pub fn known_issues(&self) -> KnownIssues {
        KnownIssues::from_entries(self.known_issue.iter().cloned())
    }

    /// Default exclusions with this file's sections layered on top
    pub fn field_exclusions(&self) -> FieldExclusions {
        let mut exclusions = FieldExclusions::default();
        for (kind, fields) in &self.metadata_exclusions {
            exclusions.set(kind.clone(), fields.iter().cloned());
        }
        exclusions
    }
}
