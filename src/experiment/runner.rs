//! Sequential multi-run driver.

use tracing::{debug, info};

use super::config::ExperimentConfig;
use super::registry::algorithm_by_name;
use super::types::{ExperimentReport, RunRecord};
use crate::error::Result;
use crate::task::Task;

/// Runs every configured algorithm on every configured problem.
///
/// Each repetition gets its own fresh [`Task`] and, with a base seed, its
/// own seed `seed + run`. Runs execute one after another. A run that fails
/// (a throwing task, typically) is recorded with its error message and the
/// experiment carries on.
///
/// # Examples
///
/// ```
/// use u_evolve::experiment::{ExperimentConfig, ExperimentRunner};
///
/// let config = ExperimentConfig::default()
///     .with_algorithms(["DE", "MTS"])
///     .with_problems(["Sphere"])
///     .with_dimension(3)
///     .with_runs(2)
///     .with_max_evals(500)
///     .with_seed(42);
/// let report = ExperimentRunner::new(config).unwrap().run();
///
/// assert_eq!(report.records.len(), 4);
/// let summary = report.summary("DE", "Sphere").unwrap();
/// assert_eq!(summary.runs, 2);
/// assert!(summary.best <= summary.worst);
/// ```
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    config: ExperimentConfig,
    tasks: Vec<Task>,
}

impl ExperimentRunner {
    /// Validates the configuration and resolves every name.
    ///
    /// # Errors
    /// Returns configuration errors, [`Error::UnknownAlgorithm`] or
    /// [`Error::UnknownProblem`](crate::error::Error::UnknownProblem).
    ///
    /// [`Error::UnknownAlgorithm`]: crate::error::Error::UnknownAlgorithm
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        for name in &config.algorithms {
            algorithm_by_name(name, None)?;
        }
        let tasks = config
            .problems
            .iter()
            .map(|name| Task::from_name(name, config.dimension, config.task.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { config, tasks })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Executes all runs.
    pub fn run(&self) -> ExperimentReport {
        let mut records = Vec::new();

        for algorithm in &self.config.algorithms {
            for (problem, template) in self.config.problems.iter().zip(&self.tasks) {
                for run in 0..self.config.runs {
                    let record = self.run_once(algorithm, problem, template, run);
                    debug!(
                        algorithm = algorithm.as_str(),
                        problem = problem.as_str(),
                        run,
                        value = record.value,
                        evaluations = record.evaluations,
                        "run recorded"
                    );
                    records.push(record);
                }
                info!(
                    algorithm = algorithm.as_str(),
                    problem = problem.as_str(),
                    runs = self.config.runs,
                    "experiment pair finished"
                );
            }
        }

        ExperimentReport {
            optimization_type: self.config.task.optimization_type,
            records,
        }
    }

    fn run_once(&self, algorithm: &str, problem: &str, template: &Task, run: usize) -> RunRecord {
        let seed = self.config.run_seed(run);
        let mut task = template.fresh();
        let outcome = algorithm_by_name(algorithm, seed).and_then(|algo| algo.optimize(&mut task));

        let mut record = RunRecord {
            algorithm: algorithm.to_string(),
            problem: problem.to_string(),
            run,
            seed,
            value: None,
            x: Vec::new(),
            evaluations: task.evals(),
            iterations: task.iters(),
            error: None,
        };
        match outcome {
            Ok(solution) => {
                record.value = Some(solution.value);
                record.x = solution.x;
            }
            Err(e) => record.error = Some(e.to_string()),
        }
        record
    }
}
