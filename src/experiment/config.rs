//! Experiment configuration.

use crate::error::{Error, Result};
use crate::task::TaskConfig;

/// Which algorithms to run on which problems, and how often.
///
/// # Examples
///
/// ```
/// use u_evolve::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::default()
///     .with_algorithms(["DE", "jDE", "MTS"])
///     .with_problems(["Sphere", "Rastrigin"])
///     .with_dimension(5)
///     .with_runs(3)
///     .with_max_evals(2_000)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.task.max_evals, Some(2_000));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Algorithm names, resolved through
    /// [`algorithm_by_name`](super::algorithm_by_name).
    pub algorithms: Vec<String>,

    /// Benchmark names, resolved through
    /// [`Benchmark::from_name`](crate::problem::Benchmark::from_name).
    pub problems: Vec<String>,

    /// Problem dimension.
    pub dimension: usize,

    /// Independent repetitions per (algorithm, problem) pair.
    pub runs: usize,

    /// Budgets and policies shared by every run.
    pub task: TaskConfig,

    /// Base seed; run `k` uses `seed + k`. `None` seeds every run randomly.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            algorithms: vec!["DE".into()],
            problems: vec!["Ackley".into()],
            dimension: 10,
            runs: 1,
            task: TaskConfig::default().with_max_evals(1_000_000),
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Sets the algorithm names.
    pub fn with_algorithms<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.algorithms = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the problem names.
    pub fn with_problems<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.problems = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the problem dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Sets the number of repetitions.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Replaces the task configuration.
    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.task = task;
        self
    }

    /// Sets the evaluation budget of every run.
    pub fn with_max_evals(mut self, n: usize) -> Self {
        self.task.max_evals = Some(n);
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed for repetition `run`.
    pub fn run_seed(&self, run: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(run as u64))
    }

    /// Validates the configuration. Names are checked when the runner is
    /// built.
    pub fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(Error::InvalidConfig("no algorithms given".into()));
        }
        if self.problems.is_empty() {
            return Err(Error::InvalidConfig("no problems given".into()));
        }
        if self.dimension == 0 {
            return Err(Error::InvalidConfig("dimension must be at least 1".into()));
        }
        if self.runs == 0 {
            return Err(Error::InvalidConfig("runs must be at least 1".into()));
        }
        let task = &self.task;
        if !task.has_budget() {
            return Err(Error::InvalidConfig(
                "experiment runs need an evaluation, iteration or time budget".into(),
            ));
        }
        task.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.algorithms, vec!["DE".to_string()]);
        assert_eq!(config.problems, vec!["Ackley".to_string()]);
        assert_eq!(config.dimension, 10);
        assert_eq!(config.runs, 1);
        assert_eq!(config.task.max_evals, Some(1_000_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_run_seed() {
        let config = ExperimentConfig::default().with_seed(10);
        assert_eq!(config.run_seed(0), Some(10));
        assert_eq!(config.run_seed(3), Some(13));
        assert_eq!(ExperimentConfig::default().run_seed(3), None);
        let config = ExperimentConfig::default().with_seed(u64::MAX);
        assert_eq!(config.run_seed(1), Some(0));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty: [&str; 0] = [];
        assert!(ExperimentConfig::default().with_algorithms(empty).validate().is_err());
        assert!(ExperimentConfig::default().with_problems(empty).validate().is_err());
        assert!(ExperimentConfig::default().with_dimension(0).validate().is_err());
        assert!(ExperimentConfig::default().with_runs(0).validate().is_err());
        assert!(ExperimentConfig::default()
            .with_task(TaskConfig::default())
            .validate()
            .is_err());
        assert!(ExperimentConfig::default()
            .with_task(TaskConfig::default().with_max_iters(10))
            .validate()
            .is_ok());
    }
}
