//! Experiment records and summaries.

use crate::task::OptimizationType;

/// Outcome of one repetition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    /// Algorithm name as configured.
    pub algorithm: String,
    /// Problem name as configured.
    pub problem: String,
    /// Repetition index.
    pub run: usize,
    /// Seed the algorithm ran with, if fixed.
    pub seed: Option<u64>,
    /// Best raw objective value, `None` if the run failed.
    pub value: Option<f64>,
    /// Best point, empty if the run failed.
    pub x: Vec<f64>,
    /// Evaluations consumed.
    pub evaluations: usize,
    /// Iteration counter at the end of the run.
    pub iterations: usize,
    /// Error message of a failed run.
    pub error: Option<String>,
}

/// Statistics over the successful runs of one (algorithm, problem) pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Successful runs.
    pub runs: usize,
    /// Failed runs.
    pub failures: usize,
    /// Best value in the optimization direction.
    pub best: f64,
    /// Worst value in the optimization direction.
    pub worst: f64,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl Summary {
    /// Summarizes `values`; `None` when there are none.
    pub fn from_values(values: &[f64], failures: usize, direction: OptimizationType) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let (min, max) = (sorted[0], sorted[n - 1]);
        let (best, worst) = match direction {
            OptimizationType::Minimization => (min, max),
            OptimizationType::Maximization => (max, min),
        };
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

        Some(Self {
            runs: n,
            failures,
            best,
            worst,
            mean,
            median,
            std: variance.sqrt(),
        })
    }
}

/// All records of an experiment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentReport {
    /// Direction the values were optimized in.
    pub optimization_type: OptimizationType,
    /// One record per (algorithm, problem, run), in execution order.
    pub records: Vec<RunRecord>,
}

impl ExperimentReport {
    /// Records of one (algorithm, problem) pair.
    pub fn runs<'a>(
        &'a self,
        algorithm: &'a str,
        problem: &'a str,
    ) -> impl Iterator<Item = &'a RunRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.algorithm == algorithm && r.problem == problem)
    }

    /// Statistics of one (algorithm, problem) pair; `None` if no run of
    /// the pair succeeded.
    pub fn summary(&self, algorithm: &str, problem: &str) -> Option<Summary> {
        let mut values = Vec::new();
        let mut failures = 0;
        for record in self.runs(algorithm, problem) {
            match record.value {
                Some(v) => values.push(v),
                None => failures += 1,
            }
        }
        Summary::from_values(&values, failures, self.optimization_type)
    }

    /// Number of failed runs.
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.error.is_some()).count()
    }
}
