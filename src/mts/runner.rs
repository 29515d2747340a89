//! MTS generation loop.
//!
//! [`MultipleTrajectorySearch`] runs the classic per-generation procedure:
//!
//! 1. every enabled individual is graded against each local-search
//!    operator and then refined by the winner,
//! 2. the global best is polished with LS1,
//! 3. the individuals with the *lowest* grades are re-enabled, giving the
//!    least successful trajectories another chance.
//!
//! Steps 1 and 3 are exposed as [`refine`] and [`reenable_worst`] so that
//! differential evolution can reuse them after its selection step.

use rand::Rng;
use tracing::debug;

use super::config::{MtsConfig, TrajectoryConfig};
use super::local_search::{LocalSearch, SearchPoint};
use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::individual::{Best, Individual};
use crate::task::Task;

/// Per-individual MTS bookkeeping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchState {
    /// Whether the individual is refined in the next generation.
    pub enabled: bool,
    /// Whether the last local-search application improved it.
    pub improved: bool,
    /// Per-dimension step size.
    pub search_range: Vec<f64>,
    /// Grade accumulated during the last refinement.
    pub grade: f64,
}

impl SearchState {
    /// Enabled state with `search_range = range * fraction`.
    pub fn new(range: &[f64], fraction: f64, improved: bool) -> Self {
        Self {
            enabled: true,
            improved,
            search_range: range.iter().map(|r| r * fraction).collect(),
            grade: 0.0,
        }
    }
}

/// Grades every operator on its own copy of the start point.
///
/// Returns the candidate with the lowest fitness and the index of the
/// operator with the highest grade (first one on ties).
fn grading_run<R: Rng + ?Sized>(
    start: &SearchPoint,
    best: &mut Best,
    config: &TrajectoryConfig,
    task: &mut Task,
    rng: &mut R,
) -> Result<(SearchPoint, usize)> {
    let mut grades = Vec::with_capacity(config.local_searches.len());
    let mut candidates = Vec::with_capacity(config.local_searches.len());

    for &ls in &config.local_searches {
        let mut point = start.clone();
        let mut grade = 0.0;
        for _ in 0..config.num_tests {
            grade += ls.apply(&mut point, best, config, task, rng)?;
        }
        grades.push(grade);
        candidates.push(point);
    }

    let winner = arg_first(&grades, |a, b| a > b);
    let fitness: Vec<f64> = candidates.iter().map(|p| p.f).collect();
    let adopted = arg_first(&fitness, |a, b| a < b);
    Ok((candidates.swap_remove(adopted), winner))
}

/// Index of the first element no other element beats under `better`.
fn arg_first(values: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut pick = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if better(v, values[pick]) {
            pick = i;
        }
    }
    pick
}

/// Refines one individual: a grading run followed by `num_searches`
/// applications of the winning operator.
///
/// The individual is disabled and its grade is reset before the grading
/// run; afterwards `state.grade` holds the grade earned by the winner.
pub fn refine<R: Rng + ?Sized>(
    x: &mut Vec<f64>,
    f: &mut f64,
    state: &mut SearchState,
    best: &mut Best,
    config: &TrajectoryConfig,
    task: &mut Task,
    rng: &mut R,
) -> Result<()> {
    state.enabled = false;
    state.grade = 0.0;

    let start = SearchPoint {
        x: x.clone(),
        f: *f,
        improved: state.improved,
        search_range: state.search_range.clone(),
    };
    let (mut point, k) = grading_run(&start, best, config, task, rng)?;

    let ls = config.local_searches[k];
    for _ in 0..config.num_searches {
        state.grade += ls.apply(&mut point, best, config, task, rng)?;
    }

    *x = point.x;
    *f = point.f;
    state.improved = point.improved;
    state.search_range = point.search_range;
    Ok(())
}

/// Enables the `num_enabled` states with the lowest grades.
///
/// States that are already enabled stay enabled.
pub fn reenable_worst(mut states: Vec<&mut SearchState>, num_enabled: usize) {
    states.sort_by(|a, b| a.grade.total_cmp(&b.grade));
    for state in states.into_iter().take(num_enabled) {
        state.enabled = true;
    }
}

/// Multiple Trajectory Search.
///
/// # Examples
///
/// ```
/// use u_evolve::algorithm::Algorithm;
/// use u_evolve::mts::{MtsConfig, MultipleTrajectorySearch};
/// use u_evolve::problem::{Benchmark, BenchmarkFunction};
/// use u_evolve::task::{Task, TaskConfig};
///
/// let mts = MultipleTrajectorySearch::new(
///     MtsConfig::default().with_population_size(5).with_seed(42),
/// ).unwrap();
/// let problem = Benchmark::new(BenchmarkFunction::Sphere, 3).unwrap();
/// let mut task = Task::new(problem, TaskConfig::default().with_max_evals(5_000)).unwrap();
///
/// let solution = mts.run(&mut task).unwrap();
/// assert!(solution.value < 1.0);
/// ```
///
/// # References
///
/// - Tseng & Chen (2008), "Multiple trajectory search for Large Scale Global
///   Optimization", IEEE CEC 2008
#[derive(Debug, Clone)]
pub struct MultipleTrajectorySearch {
    config: MtsConfig,
}

impl MultipleTrajectorySearch {
    /// Creates the algorithm after validating `config`.
    pub fn new(config: MtsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &MtsConfig {
        &self.config
    }
}

impl Algorithm for MultipleTrajectorySearch {
    type State = SearchState;

    fn name(&self) -> &str {
        if self.config.trajectory.local_searches.contains(&LocalSearch::Ls1v1) {
            "MTSv1"
        } else {
            "MTS"
        }
    }

    fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    fn init_population<R: Rng + ?Sized>(
        &self,
        task: &mut Task,
        rng: &mut R,
    ) -> Result<Vec<Individual<SearchState>>> {
        let fraction = self.config.trajectory.initial_range_fraction;
        (0..self.config.population_size)
            .map(|_| {
                let state = SearchState::new(task.range(), fraction, true);
                Individual::random(task, state, rng)
            })
            .collect()
    }

    fn run_iteration<R: Rng + ?Sized>(
        &self,
        task: &mut Task,
        population: &mut Vec<Individual<SearchState>>,
        best: &mut Best,
        rng: &mut R,
    ) -> Result<()> {
        let trajectory = &self.config.trajectory;

        let mut refined = 0usize;
        for ind in population.iter_mut() {
            if !ind.state.enabled {
                continue;
            }
            refine(&mut ind.x, &mut ind.f, &mut ind.state, best, trajectory, task, rng)?;
            refined += 1;
        }

        for _ in 0..self.config.num_searches_best {
            let mut point = SearchPoint {
                x: best.x.clone(),
                f: best.f,
                improved: false,
                search_range: task.range().iter().map(|r| r / 10.0).collect(),
            };
            LocalSearch::Ls1.apply(&mut point, best, trajectory, task, rng)?;
        }

        reenable_worst(
            population.iter_mut().map(|ind| &mut ind.state).collect(),
            trajectory.num_enabled,
        );
        debug!(refined, best = best.f, "mts generation");
        Ok(())
    }
}
