// Configuration for threshold-based regression classification

use std::collections::BTreeSet;

/// Threshold applied when a metric carries no override (5%)
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Classifier configuration, threaded explicitly into [`super::Classifier`]
///
/// # Example
/// ```
/// use benchmark_reporter::regression::ClassifierConfig;
///
/// let config = ClassifierConfig::default().with_ignored_list("GC.Alloc;Memory");
/// assert_eq!(config.default_threshold, 0.05);
/// assert!(config.is_ignored("Memory"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Relative difference tolerated before a metric is classified
    ///
    /// `|candidate - baseline| / baseline` must exceed this to count as a
    /// regression or progression. 0.05 means 5%.
    pub default_threshold: f64,

    /// Metric names never classified, even with a baseline counterpart
    pub ignored_metrics: BTreeSet<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_THRESHOLD,
            ignored_metrics: BTreeSet::new(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.default_threshold = threshold;
        self
    }

    /// Add metric names from a `;` separated list (empty entries skipped)
    pub fn with_ignored_list(mut self, list: &str) -> Self {
        self.ignored_metrics.extend(parse_metric_list(list));
        self
    }

    pub fn with_ignored<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_metrics.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_ignored(&self, metric: &str) -> bool {
        self.ignored_metrics.contains(metric)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.default_threshold.is_finite() || self.default_threshold < 0.0 {
            return Err(format!(
                "threshold must be a non-negative number, got {}",
                self.default_threshold
            ));
        }
        Ok(())
    }
}

/// Split a `;` separated metric list, trimming whitespace
pub fn parse_metric_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
