// Known-issues table: accepted regressions keyed by (test name, metric name)
//
// A regression listed here is still reported, but it does not fail its test.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One accepted regression as written in TOML
///
/// ```toml
/// [[known_issue]]
/// test = "Rendering.Boot"
/// metric = "FrameTime"
/// details = "Shader warmup moved to first frame"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownIssueEntry {
    pub test: String,
    pub metric: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Default, Deserialize)]
struct KnownIssueFile {
    #[serde(default)]
    known_issue: Vec<KnownIssueEntry>,
}

/// Lookup table of accepted regressions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownIssues {
    entries: HashMap<(String, String), String>,
}

impl KnownIssues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a TOML file of `[[known_issue]]` entries
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ReportError::Configuration(msg) => {
                ReportError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: KnownIssueFile = toml::from_str(content)
            .map_err(|e| ReportError::Configuration(format!("invalid known-issues TOML: {}", e)))?;
        Ok(Self::from_entries(file.known_issue))
    }

    pub fn from_entries<I: IntoIterator<Item = KnownIssueEntry>>(entries: I) -> Self {
        let mut table = Self::new();
        table.extend(entries);
        table
    }

    pub fn extend<I: IntoIterator<Item = KnownIssueEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.insert(entry.test, entry.metric, entry.details);
        }
    }

    /// Add every entry of `other`; its details win for shared keys
    pub fn merge(&mut self, other: KnownIssues) {
        self.entries.extend(other.entries);
    }

    pub fn insert(
        &mut self,
        test: impl Into<String>,
        metric: impl Into<String>,
        details: impl Into<String>,
    ) {
        self.entries
            .insert((test.into(), metric.into()), details.into());
    }

    pub fn lookup(&self, test: &str, metric: &str) -> Option<&str> {
        self.entries
            .get(&(test.to_string(), metric.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
