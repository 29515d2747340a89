//! The bounded-evaluation [`Task`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use super::config::TaskConfig;
use super::repair::RepairStrategy;
use super::types::{OptimizationType, StopMode, StopReason};
use crate::error::{Error, Result};
use crate::problem::{validate_bounds, Benchmark, Problem};

/// One optimization run's view of a problem.
///
/// A task owns the evaluation and iteration counters, the best-so-far
/// point and the stopping policy. It is single-owner mutable state: every
/// independent run needs its own task (see [`Task::fresh`]).
///
/// All fitness values handed to algorithms are *signed*: the raw objective
/// multiplied by [`OptimizationType::sign`], so lower is always better.
///
/// # Lifecycle
///
/// The task is active while no budget is exhausted. Once one is, it never
/// becomes active again (short of [`reset`](Task::reset)):
///
/// - in [`StopMode::Stopping`], [`eval`](Task::eval) returns `+inf`
///   without counting or calling the problem;
/// - in [`StopMode::Throwing`], [`eval`](Task::eval) fails with the error of
///   the first exhausted resource, checked in the order evaluations,
///   iterations, reference value, time.
///
/// # Examples
///
/// ```
/// use u_evolve::problem::{Benchmark, BenchmarkFunction};
/// use u_evolve::task::{Task, TaskConfig};
///
/// let problem = Benchmark::new(BenchmarkFunction::Sphere, 3).unwrap();
/// let mut task = Task::new(problem, TaskConfig::default().with_max_evals(2)).unwrap();
///
/// assert_eq!(task.eval(&[1.0, 0.0, 0.0]).unwrap(), 1.0);
/// assert_eq!(task.eval(&[0.0, 0.0, 0.0]).unwrap(), 0.0);
/// assert!(task.is_stopping_condition());
/// assert_eq!(task.eval(&[0.0, 0.0, 0.0]).unwrap(), f64::INFINITY);
/// assert_eq!(task.evals(), 2);
/// ```
#[derive(Clone)]
pub struct Task {
    problem: Arc<dyn Problem>,
    config: TaskConfig,
    range: Vec<f64>,
    evals: usize,
    iters: usize,
    best_x: Option<Vec<f64>>,
    best_f: f64,
    improvements: Vec<(usize, f64)>,
    started: Instant,
    exhausted_reported: bool,
}

impl Task {
    /// Creates a task over an owned problem.
    ///
    /// # Errors
    /// Fails if the configuration or the problem's bounds are invalid.
    pub fn new<P: Problem + 'static>(problem: P, config: TaskConfig) -> Result<Self> {
        Self::from_shared(Arc::new(problem), config)
    }

    /// Creates a task over a shared problem, e.g. one reused across
    /// repetitions.
    pub fn from_shared(problem: Arc<dyn Problem>, config: TaskConfig) -> Result<Self> {
        config.validate()?;
        let dimension = problem.dimension();
        if dimension == 0 {
            return Err(Error::InvalidConfig("dimension must be at least 1".into()));
        }
        for bound in [problem.lower(), problem.upper()] {
            if bound.len() != dimension {
                return Err(Error::BoundsLength {
                    expected: dimension,
                    got: bound.len(),
                });
            }
        }
        validate_bounds(problem.lower(), problem.upper())?;

        let range = problem
            .upper()
            .iter()
            .zip(problem.lower())
            .map(|(hi, lo)| hi - lo)
            .collect();

        Ok(Self {
            problem,
            config,
            range,
            evals: 0,
            iters: 0,
            best_x: None,
            best_f: f64::INFINITY,
            improvements: Vec::new(),
            started: Instant::now(),
            exhausted_reported: false,
        })
    }

    /// Resolves a benchmark by name and wraps it in a task.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProblem`] for unregistered names.
    pub fn from_name(name: &str, dimension: usize, config: TaskConfig) -> Result<Self> {
        Self::new(Benchmark::from_name(name, dimension)?, config)
    }

    /// A new task over the same problem and configuration, with all
    /// counters and best-so-far state cleared.
    pub fn fresh(&self) -> Self {
        let mut task = self.clone();
        task.reset();
        task
    }

    /// Clears counters, best-so-far state and the clock.
    pub fn reset(&mut self) {
        self.evals = 0;
        self.iters = 0;
        self.best_x = None;
        self.best_f = f64::INFINITY;
        self.improvements.clear();
        self.started = Instant::now();
        self.exhausted_reported = false;
    }

    /// The wrapped problem.
    pub fn problem(&self) -> &dyn Problem {
        self.problem.as_ref()
    }

    /// The task configuration.
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Problem dimension.
    pub fn dimension(&self) -> usize {
        self.range.len()
    }

    /// Lower bounds.
    pub fn lower(&self) -> &[f64] {
        self.problem.lower()
    }

    /// Upper bounds.
    pub fn upper(&self) -> &[f64] {
        self.problem.upper()
    }

    /// `upper - lower` per component.
    pub fn range(&self) -> &[f64] {
        &self.range
    }

    /// Optimization direction.
    pub fn optimization_type(&self) -> OptimizationType {
        self.config.optimization_type
    }

    /// Evaluations used so far.
    pub fn evals(&self) -> usize {
        self.evals
    }

    /// Iterations started so far.
    pub fn iters(&self) -> usize {
        self.iters
    }

    /// Evaluation budget.
    pub fn max_evals(&self) -> Option<usize> {
        self.config.max_evals
    }

    /// Iteration budget.
    pub fn max_iters(&self) -> Option<usize> {
        self.config.max_iters
    }

    /// Time since creation or the last reset.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Best point evaluated so far.
    pub fn best_x(&self) -> Option<&[f64]> {
        self.best_x.as_deref()
    }

    /// Best signed fitness so far (`+inf` before the first evaluation).
    pub fn best_fitness(&self) -> f64 {
        self.best_f
    }

    /// Best raw objective value so far, if any point was evaluated.
    pub fn best_value(&self) -> Option<f64> {
        self.best_x.as_ref().map(|_| self.best_f * self.sign())
    }

    fn sign(&self) -> f64 {
        self.config.optimization_type.sign()
    }

    /// Evaluates `x` and returns its signed fitness.
    ///
    /// The evaluation counter is incremented only when the problem is
    /// actually called. A NaN objective is recorded as `+inf`.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if `x` has the wrong length;
    /// - in throwing mode, the budget error of the exhausted resource.
    pub fn eval(&mut self, x: &[f64]) -> Result<f64> {
        if x.len() != self.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.dimension(),
                got: x.len(),
            });
        }

        if let Some(reason) = self.stop_reason() {
            if self.config.stop_mode == StopMode::Throwing {
                return Err(reason.into());
            }
            if !self.exhausted_reported {
                self.exhausted_reported = true;
                debug!(?reason, evals = self.evals, iters = self.iters, "task exhausted");
            }
            return Ok(f64::INFINITY);
        }

        self.evals += 1;
        let raw = self.problem.evaluate(x);
        let fitness = match raw * self.sign() {
            f if f.is_nan() => f64::INFINITY,
            f => f,
        };

        if fitness < self.best_f {
            self.best_f = fitness;
            self.best_x = Some(x.to_vec());
            self.improvements.push((self.evals, fitness));
            if self.config.enable_logging {
                info!(
                    problem = self.problem.name(),
                    evals = self.evals,
                    value = raw,
                    "new best"
                );
            }
        }

        Ok(fitness)
    }

    /// Whether every component of `x` is inside the bounds.
    pub fn is_feasible(&self, x: &[f64]) -> bool {
        RepairStrategy::is_feasible(x, self.lower(), self.upper())
    }

    /// Repairs `x` in place with the configured strategy.
    pub fn repair<R: Rng + ?Sized>(&self, x: &mut [f64], rng: &mut R) {
        self.config
            .repair
            .apply(x, self.problem.lower(), self.problem.upper(), rng);
    }

    /// Increments the iteration counter.
    pub fn next_iter(&mut self) {
        self.iters += 1;
    }

    /// The first exhausted resource, in priority order, if any.
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.config.max_evals.is_some_and(|max| self.evals >= max) {
            return Some(StopReason::Evaluations);
        }
        if self.config.max_iters.is_some_and(|max| self.iters >= max) {
            return Some(StopReason::Iterations);
        }
        if let Some(reference) = self.config.reference_value {
            if self.best_f <= reference * self.sign() {
                return Some(StopReason::ReferenceValue);
            }
        }
        if let Some(ms) = self.config.time_limit_ms {
            if self.started.elapsed() >= Duration::from_millis(ms) {
                return Some(StopReason::TimeLimit);
            }
        }
        None
    }

    /// Whether any budget is exhausted.
    pub fn is_stopping_condition(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// Checks the stopping condition, *then* increments the iteration
    /// counter, and returns the pre-increment result.
    ///
    /// Driving loops call this at the top of every generation: a `false`
    /// return means "start the next generation".
    pub fn is_stopping_condition_next_iter(&mut self) -> bool {
        let stop = self.is_stopping_condition();
        self.next_iter();
        stop
    }

    /// Best-so-far convergence curve.
    ///
    /// Returns evaluation indices and the best raw objective value at each
    /// of them, starting with the first evaluation and ending at the last
    /// improvement. Evaluations between two improvements repeat the
    /// earlier value.
    pub fn convergence(&self) -> (Vec<usize>, Vec<f64>) {
        let sign = self.sign();
        let mut evals = Vec::new();
        let mut values = Vec::new();
        for (i, &(at, f)) in self.improvements.iter().enumerate() {
            let until = self
                .improvements
                .get(i + 1)
                .map_or(at + 1, |&(next, _)| next);
            for e in at..until {
                evals.push(e);
                values.push(f * sign);
            }
        }
        (evals, values)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("problem", &self.problem.name())
            .field("dimension", &self.dimension())
            .field("config", &self.config)
            .field("evals", &self.evals)
            .field("iters", &self.iters)
            .field("best_f", &self.best_f)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{BenchmarkFunction, FnProblem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const D: usize = 10;

    fn squares() -> FnProblem<impl Fn(&[f64]) -> f64 + Send + Sync> {
        FnProblem::new("squares", D, -10.0, 10.0, |x: &[f64]| {
            x.iter().map(|v| v * v).sum()
        })
        .unwrap()
    }

    fn stopping_task() -> Task {
        let config = TaskConfig::default()
            .with_max_evals(10)
            .with_max_iters(10)
            .with_reference_value(1.0);
        Task::new(squares(), config).unwrap()
    }

    fn throwing_task() -> Task {
        let config = TaskConfig::default()
            .with_max_evals(10)
            .with_max_iters(10)
            .with_reference_value(0.0)
            .throwing();
        Task::new(squares(), config).unwrap()
    }

    #[test]
    fn test_fresh_task_state() {
        let config = TaskConfig::default();
        let problem = FnProblem::new(
            "tiled",
            6,
            vec![2.0, 1.0, 1.0],
            vec![10.0, 10.0, 2.0],
            |x: &[f64]| x.iter().sum(),
        )
        .unwrap();
        let mut task = Task::new(problem, config).unwrap();
        assert_eq!(task.dimension(), 6);
        assert_eq!(task.range(), &[8.0, 9.0, 1.0, 8.0, 9.0, 1.0]);
        assert_eq!(task.max_evals(), None);
        assert_eq!(task.max_iters(), None);
        assert_eq!(task.evals(), 0);
        assert_eq!(task.iters(), 0);
        assert!(!task.is_stopping_condition());
        assert!(!task.is_stopping_condition_next_iter());
        assert_eq!(task.iters(), 1);
        assert!(!task.is_feasible(&[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]));
        assert!(task.best_x().is_none());
        assert!(task.best_value().is_none());
    }

    #[test]
    fn test_is_feasible() {
        let task = stopping_task();
        assert!(task.is_feasible(&[10.0; D]));
        assert!(task.is_feasible(&[-10.0; D]));
        assert!(!task.is_feasible(&[-20.0; D]));
        assert!(!task.is_feasible(&[20.0; D]));
    }

    #[test]
    fn test_next_iter_reaches_budget() {
        let mut task = stopping_task();
        for _ in 0..10 {
            assert!(!task.is_stopping_condition());
            task.next_iter();
        }
        assert!(task.is_stopping_condition());
        assert_eq!(task.stop_reason(), Some(StopReason::Iterations));
    }

    #[test]
    fn test_check_then_increment() {
        let mut task = stopping_task();
        for i in 0..10 {
            assert!(!task.is_stopping_condition_next_iter(), "stopped at {i}");
            assert_eq!(task.iters(), i + 1);
        }
        assert!(task.is_stopping_condition_next_iter());
        assert_eq!(task.iters(), 11);
    }

    #[test]
    fn test_eval_counts_up_to_budget() {
        let mut task = stopping_task();
        let x = [1.0; D];
        for i in 0..10 {
            assert_eq!(task.eval(&x).unwrap(), D as f64, "evaluation {i}");
            assert_eq!(task.evals(), i + 1);
        }
        assert!(task.is_stopping_condition());
        assert_eq!(task.eval(&x).unwrap(), f64::INFINITY);
        assert_eq!(task.evals(), 10);
    }

    #[test]
    fn test_eval_after_iteration_budget() {
        let mut task = stopping_task();
        for _ in 0..10 {
            task.next_iter();
        }
        assert_eq!(task.eval(&[1.0; D]).unwrap(), f64::INFINITY);
        assert_eq!(task.evals(), 0);
    }

    #[test]
    fn test_stop_on_evals_budget() {
        let mut task = stopping_task();
        let x = [1.0; D];
        for _ in 0..9 {
            task.eval(&x).unwrap();
            assert!(!task.is_stopping_condition());
        }
        task.eval(&x).unwrap();
        assert_eq!(task.stop_reason(), Some(StopReason::Evaluations));
    }

    #[test]
    fn test_stop_on_reference_value() {
        let mut task = stopping_task();
        for _ in 0..5 {
            assert!(!task.is_stopping_condition());
            assert_eq!(task.eval(&[1.0; D]).unwrap(), D as f64);
            task.next_iter();
        }
        assert_eq!(task.eval(&[0.0; D]).unwrap(), 0.0);
        assert!(task.is_stopping_condition());
        assert_eq!(task.stop_reason(), Some(StopReason::ReferenceValue));
        assert_eq!(task.iters(), 5);
    }

    #[test]
    fn test_maximization_signs_fitness() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 2).unwrap();
        let config = TaskConfig::default()
            .with_optimization_type(OptimizationType::Maximization)
            .with_reference_value(8.0);
        let mut task = Task::new(problem, config).unwrap();

        assert_eq!(task.eval(&[1.0, 1.0]).unwrap(), -2.0);
        assert_eq!(task.best_value(), Some(2.0));
        assert!(!task.is_stopping_condition());
        assert_eq!(task.eval(&[2.0, 2.0]).unwrap(), -8.0);
        assert_eq!(task.best_value(), Some(8.0));
        assert_eq!(task.stop_reason(), Some(StopReason::ReferenceValue));
        // exhausted: still the worst possible signed value
        assert_eq!(task.eval(&[5.0, 5.0]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_best_so_far_is_monotone() {
        let mut task = Task::new(squares(), TaskConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut last = task.best_fitness();
        for _ in 0..200 {
            let x: Vec<f64> = (0..D).map(|_| rng.random_range(-10.0..10.0)).collect();
            let f = task.eval(&x).unwrap();
            assert!(task.best_fitness() <= last);
            assert!(task.best_fitness() <= f);
            last = task.best_fitness();
        }
    }

    #[test]
    fn test_nan_is_worst() {
        let problem = Benchmark::new(BenchmarkFunction::Infinity, 2).unwrap();
        let mut task = Task::new(problem, TaskConfig::default()).unwrap();
        assert_eq!(task.eval(&[0.0, 0.0]).unwrap(), f64::INFINITY);
        assert_eq!(task.evals(), 1);
        assert!(task.best_x().is_none());
        let f = task.eval(&[0.5, 0.5]).unwrap();
        assert!(f.is_finite());
        assert_eq!(task.best_fitness(), f);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut task = stopping_task();
        assert_eq!(
            task.eval(&[1.0; 3]).unwrap_err(),
            Error::DimensionMismatch {
                expected: D,
                got: 3
            }
        );
        assert_eq!(task.evals(), 0);
    }

    #[test]
    fn test_throwing_eval_budget() {
        let mut task = throwing_task();
        let x = [1.0; D];
        for _ in 0..10 {
            assert_eq!(task.eval(&x).unwrap(), D as f64);
        }
        assert_eq!(task.eval(&x).unwrap_err(), Error::EvaluationBudgetExhausted);
        assert_eq!(task.evals(), 10);
    }

    #[test]
    fn test_throwing_iteration_budget() {
        let mut task = throwing_task();
        for _ in 0..10 {
            task.next_iter();
        }
        assert_eq!(
            task.eval(&[1.0; D]).unwrap_err(),
            Error::IterationBudgetExhausted
        );
    }

    #[test]
    fn test_throwing_reference_value() {
        let mut task = throwing_task();
        for _ in 0..5 {
            assert_eq!(task.eval(&[1.0; D]).unwrap(), D as f64);
            task.next_iter();
        }
        assert_eq!(task.eval(&[0.0; D]).unwrap(), 0.0);
        assert_eq!(task.eval(&[0.0; D]).unwrap_err(), Error::ReferenceValueReached);
    }

    #[test]
    fn test_throwing_priority_order() {
        let mut task = throwing_task();
        for _ in 0..9 {
            task.eval(&[1.0; D]).unwrap();
        }
        task.eval(&[0.0; D]).unwrap();
        for _ in 0..10 {
            task.next_iter();
        }
        // evaluations, iterations and reference value are all exhausted
        assert_eq!(task.eval(&[0.0; D]).unwrap_err(), Error::EvaluationBudgetExhausted);
    }

    #[test]
    fn test_time_limit() {
        let config = TaskConfig::default().with_time_limit_ms(1);
        let mut task = Task::new(squares(), config).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(task.stop_reason(), Some(StopReason::TimeLimit));
        assert_eq!(task.eval(&[0.0; D]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_convergence_single_steps() {
        let mut task = stopping_task();
        let mut expected = Vec::new();
        for i in 0..10 {
            let f = task.eval(&[10.0 - i as f64; D]).unwrap();
            expected.push(f);
        }
        let (evals, values) = task.convergence();
        assert_eq!(evals, (1..=10).collect::<Vec<_>>());
        assert_eq!(values, expected);
    }

    #[test]
    fn test_convergence_fills_gaps() {
        let mut task = stopping_task();
        let mut expected = Vec::new();
        for i in 0..10 {
            let v = if (3..=5).contains(&i) { 4.0 } else { 10.0 - i as f64 };
            expected.push(task.eval(&[v; D]).unwrap());
        }
        let (evals, values) = task.convergence();
        assert_eq!(evals, (1..=10).collect::<Vec<_>>());
        assert_eq!(values, expected);
    }

    #[test]
    fn test_repair_uses_configured_strategy() {
        let config = TaskConfig::default().with_repair(RepairStrategy::LimitInverse);
        let task = Task::new(squares(), config).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut x = [0.0; D];
        x[0] = -11.0;
        x[1] = 11.0;
        task.repair(&mut x, &mut rng);
        assert_eq!(x[0], 10.0);
        assert_eq!(x[1], -10.0);
        assert!(task.is_feasible(&x));
    }

    #[test]
    fn test_reset_and_fresh() {
        let mut task = stopping_task();
        for _ in 0..10 {
            task.eval(&[1.0; D]).unwrap();
        }
        let fresh = task.fresh();
        assert_eq!(fresh.evals(), 0);
        assert!(fresh.best_x().is_none());
        assert_eq!(task.evals(), 10);

        task.reset();
        assert_eq!(task.evals(), 0);
        assert!(!task.is_stopping_condition());
    }

    #[test]
    fn test_from_name() {
        let task = Task::from_name("rosenbrock", 4, TaskConfig::default()).unwrap();
        assert_eq!(task.lower(), &[-30.0; 4]);
        assert!(matches!(
            Task::from_name("nope", 4, TaskConfig::default()),
            Err(Error::UnknownProblem(_))
        ));
    }
}
