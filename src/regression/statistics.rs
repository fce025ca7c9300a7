// Summary statistics for raw sample sequences
//
// Every statistic is computed for every sample group, whichever aggregation is
// the headline value, because reporting exposes all six. Standard deviation
// uses the population formula (divide by n). Empty sequences summarize to zero.

use crate::model::{AggregationType, PerformanceTestRun, SampleGroupResult};

/// The six summary statistics of one sample sequence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleStatistics {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub average: f64,
    pub standard_deviation: f64,
    pub sum: f64,
}

impl SampleStatistics {
    /// Summarize a sample sequence
    ///
    /// # Example
    /// ```
    /// use benchmark_reporter::regression::SampleStatistics;
    ///
    /// let stats = SampleStatistics::from_samples(&[2.0, 4.0, 6.0, 8.0]);
    /// assert_eq!(stats.median, 5.0);
    /// assert_eq!(stats.average, 5.0);
    /// assert!((stats.standard_deviation - 5.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = samples.len() as f64;
        let sum: f64 = samples.iter().sum();
        let average = sum / count;
        let variance = samples
            .iter()
            .map(|x| {
                let d = x - average;
                d * d
            })
            .sum::<f64>()
            / count;

        Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: median_sorted(&sorted),
            average,
            standard_deviation: variance.sqrt(),
            sum,
        }
    }

    /// Statistic selected by an aggregation type
    pub fn value_of(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Min => self.min,
            AggregationType::Max => self.max,
            AggregationType::Median => self.median,
            AggregationType::Average => self.average,
            AggregationType::Sum => self.sum,
        }
    }
}

/// Median of an unsorted sample sequence (0.0 when empty)
///
/// Even-length sequences average the two middle elements.
pub fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Headline value of `samples` under `aggregation`
pub fn aggregate(samples: &[f64], aggregation: AggregationType) -> f64 {
    SampleStatistics::from_samples(samples).value_of(aggregation)
}

/// Fill in the statistics of one sample group
pub fn aggregate_group(group: &mut SampleGroupResult) {
    group.statistics = Some(SampleStatistics::from_samples(&group.samples));
}

/// Aggregation pass over every sample group of a run
pub fn aggregate_run(run: &mut PerformanceTestRun) {
    for test in &mut run.results {
        for group in &mut test.sample_groups {
            aggregate_group(group);
        }
    }
}
