//! The algorithm execution contract.
//!
//! Every population-based algorithm in this crate follows the same state
//! machine:
//!
//! ```text
//! init_population → [ stop? → run_iteration ]* → Solution
//! ```
//!
//! [`Algorithm`] captures the two algorithm-specific steps and provides the
//! driving loop as a default [`run`](Algorithm::run). The loop consults
//! [`Task::is_stopping_condition_next_iter`] at the top of every generation;
//! there is no other cancellation point.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::individual::{Best, Individual};
use crate::task::Task;

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Best point found.
    pub x: Vec<f64>,
    /// Raw objective value at `x` (not sign-adjusted).
    pub value: f64,
    /// Evaluations consumed by the run.
    pub evaluations: usize,
    /// Iteration counter at the end of the run.
    pub iterations: usize,
}

impl Solution {
    fn from_best(best: Best, task: &Task) -> Self {
        Self {
            value: best.f * task.optimization_type().sign(),
            x: best.x,
            evaluations: task.evals(),
            iterations: task.iters(),
        }
    }
}

/// A population-based optimizer.
///
/// Implementors supply population initialization and one generation step;
/// the provided [`run`](Algorithm::run) drives them until the task stops.
/// All randomness flows through the `rng` argument, so a fixed
/// [`seed`](Algorithm::seed) reproduces a run exactly.
pub trait Algorithm {
    /// Per-individual state (adapted parameters, step sizes, ...).
    type State: Clone + fmt::Debug;

    /// Short display name.
    fn name(&self) -> &str;

    /// Seed for the run RNG. `None` draws a fresh one per run.
    fn seed(&self) -> Option<u64>;

    /// Creates and evaluates the initial population.
    fn init_population<R: Rng + ?Sized>(
        &self,
        task: &mut Task,
        rng: &mut R,
    ) -> Result<Vec<Individual<Self::State>>>;

    /// Advances the population by one generation and updates `best`.
    fn run_iteration<R: Rng + ?Sized>(
        &self,
        task: &mut Task,
        population: &mut Vec<Individual<Self::State>>,
        best: &mut Best,
        rng: &mut R,
    ) -> Result<()>;

    /// Runs the algorithm on `task` until a stopping condition holds.
    ///
    /// The task must carry an evaluation, iteration or time budget; a
    /// reference value alone is not enough to guarantee termination.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for a task without a budget, and
    /// propagates budget errors from a throwing task and any configuration
    /// error surfaced while initializing.
    fn run(&self, task: &mut Task) -> Result<Solution> {
        if !task.config().has_budget() {
            return Err(Error::InvalidConfig(
                "task needs an evaluation, iteration or time budget".into(),
            ));
        }
        let seed = self.seed().unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        debug!(
            algorithm = self.name(),
            problem = task.problem().name(),
            dimension = task.dimension(),
            seed,
            "run started"
        );

        let mut population = self.init_population(task, &mut rng)?;
        let mut best = Best::from_population(&population);

        while !task.is_stopping_condition_next_iter() {
            self.run_iteration(task, &mut population, &mut best, &mut rng)?;
            trace!(
                iteration = task.iters(),
                population = population.len(),
                best = best.f,
                "generation finished"
            );
        }

        let solution = Solution::from_best(best, task);
        debug!(
            algorithm = self.name(),
            value = solution.value,
            evaluations = solution.evaluations,
            iterations = solution.iterations,
            "run finished"
        );
        Ok(solution)
    }
}

/// Object-safe view of an [`Algorithm`], used where algorithms are picked
/// at runtime (e.g. by name).
pub trait Optimizer {
    /// Display name of the underlying algorithm.
    fn algorithm_name(&self) -> &str;

    /// Runs the algorithm on `task`.
    fn optimize(&self, task: &mut Task) -> Result<Solution>;
}

impl<A: Algorithm> Optimizer for A {
    fn algorithm_name(&self) -> &str {
        self.name()
    }

    fn optimize(&self, task: &mut Task) -> Result<Solution> {
        self.run(task)
    }
}
