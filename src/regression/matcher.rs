// Baseline matching by identity key (test name, metric name, unit)
//
// Matching is exact and case-sensitive. A candidate metric without a
// counterpart is simply unmatched; that is expected when tests or metrics
// are added.

use crate::error::{ReportError, Result};
use crate::model::{BaselineKey, PerformanceTestRun, SampleGroupResult};
use std::collections::{HashMap, HashSet};

/// Index over a baseline run's sample groups
#[derive(Debug)]
pub struct BaselineIndex<'a> {
    groups: HashMap<BaselineKey<'a>, &'a SampleGroupResult>,
}

impl<'a> BaselineIndex<'a> {
    /// Build the index, rejecting duplicate keys within one test
    ///
    /// When the same test name appears twice in the baseline, only the first
    /// test with that name is indexed.
    pub fn build(baseline: &'a PerformanceTestRun) -> Result<Self> {
        let mut groups = HashMap::new();
        let mut tests = HashSet::new();

        for test in &baseline.results {
            if !tests.insert(test.name.as_str()) {
                continue;
            }
            for group in &test.sample_groups {
                let key = test.key_of(group);
                if groups.insert(key, group).is_some() {
                    return Err(ReportError::InvariantViolation(format!(
                        "baseline test '{}' has duplicate metric '{}' ({})",
                        test.name, group.name, group.unit
                    )));
                }
            }
        }

        Ok(Self { groups })
    }

    pub fn lookup(&self, key: &BaselineKey<'_>) -> Option<&'a SampleGroupResult> {
        // Candidate keys borrow from another run; shorten the key lifetime to match.
        let groups: &HashMap<BaselineKey<'_>, &'a SampleGroupResult> = &self.groups;
        groups.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Position of a matched candidate metric plus its baseline counterpart
#[derive(Debug, Clone, Copy)]
pub struct MetricMatch<'a> {
    pub test_index: usize,
    pub group_index: usize,
    pub baseline: &'a SampleGroupResult,
}

/// Pair every candidate metric with its baseline counterpart
///
/// Returns the matches in candidate document order. Unmatched metrics are
/// left out. Fails only on duplicate keys, which the normalizer rejects.
pub fn match_metrics<'b>(
    baseline: &'b PerformanceTestRun,
    candidate: &PerformanceTestRun,
) -> Result<Vec<MetricMatch<'b>>> {
    let index = BaselineIndex::build(baseline)?;
    let mut matches = Vec::new();

    for (test_index, test) in candidate.results.iter().enumerate() {
        let mut seen = HashSet::new();
        for (group_index, group) in test.sample_groups.iter().enumerate() {
            let key = test.key_of(group);
            if !seen.insert(key) {
                return Err(ReportError::InvariantViolation(format!(
                    "test '{}' has duplicate metric '{}' ({})",
                    test.name, group.name, group.unit
                )));
            }
            if let Some(baseline_group) = index.lookup(&key) {
                matches.push(MetricMatch {
                    test_index,
                    group_index,
                    baseline: baseline_group,
                });
            }
        }
    }

    Ok(matches)
}
