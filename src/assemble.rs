//! Final ordering of runs for reporting

use crate::model::PerformanceTestRunResult;

/// Baseline first (when present), then candidates by ascending `result_name`
///
/// The sort is stable and compares names ordinally, so equal names keep
/// their load order.
///
/// # Example
/// ```
/// use benchmark_reporter::assemble::assemble_runs;
/// use benchmark_reporter::model::{PerformanceTestRun, PerformanceTestRunResult};
///
/// let baseline = PerformanceTestRunResult::baseline("B", PerformanceTestRun::default());
/// let candidates = vec![
///     PerformanceTestRunResult::new("b_run", PerformanceTestRun::default()),
///     PerformanceTestRunResult::new("a_run", PerformanceTestRun::default()),
/// ];
/// let names: Vec<_> = assemble_runs(Some(baseline), candidates)
///     .into_iter()
///     .map(|r| r.result_name)
///     .collect();
/// assert_eq!(names, ["B", "a_run", "b_run"]);
/// ```
pub fn assemble_runs(
    baseline: Option<PerformanceTestRunResult>,
    mut candidates: Vec<PerformanceTestRunResult>,
) -> Vec<PerformanceTestRunResult> {
    candidates.sort_by(|a, b| a.result_name.cmp(&b.result_name));

    let mut runs = Vec::with_capacity(candidates.len() + 1);
    runs.extend(baseline);
    runs.extend(candidates);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PerformanceTestRun;

    fn named(name: &str) -> PerformanceTestRunResult {
        PerformanceTestRunResult::new(name, PerformanceTestRun::default())
    }

    fn names(runs: &[PerformanceTestRunResult]) -> Vec<&str> {
        runs.iter().map(|r| r.result_name.as_str()).collect()
    }

    #[test]
    fn test_without_baseline() {
        let runs = assemble_runs(None, vec![named("z"), named("m"), named("a")]);
        assert_eq!(names(&runs), ["a", "m", "z"]);
    }

    #[test]
    fn test_ordinal_case_sensitive() {
        let runs = assemble_runs(None, vec![named("beta"), named("Beta"), named("alpha")]);
        assert_eq!(names(&runs), ["Beta", "alpha", "beta"]);
    }

    #[test]
    fn test_baseline_stays_first_even_if_name_sorts_later() {
        let baseline = PerformanceTestRunResult::baseline("zz_base", PerformanceTestRun::default());
        let runs = assemble_runs(Some(baseline), vec![named("a")]);
        assert_eq!(names(&runs), ["zz_base", "a"]);
        assert!(runs[0].is_baseline);
    }

    #[test]
    fn test_equal_names_keep_load_order() {
        let mut first = named("run");
        first.source = Some("one/run.json".into());
        let mut second = named("run");
        second.source = Some("two/run.json".into());

        let runs = assemble_runs(None, vec![first, second]);
        assert_eq!(runs[0].source.as_deref(), Some(std::path::Path::new("one/run.json")));
    }

    #[test]
    fn test_empty() {
        assert!(assemble_runs(None, Vec::new()).is_empty());
    }
}
