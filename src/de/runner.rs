//! Differential evolution generation loop.

use rand::Rng;
use tracing::{debug, trace};

use super::adaptation::{Aging, ControlParams, PopulationSchedule};
use super::config::DeConfig;
use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::individual::{Best, Individual};
use crate::mts::{reenable_worst, refine, LocalSearch, SearchState};
use crate::task::Task;

/// Per-individual DE state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeState {
    /// Control parameters the individual was produced with.
    pub control: ControlParams,
    /// MTS bookkeeping for hybrid variants.
    pub search: Option<SearchState>,
    /// Generations survived under an aging schedule.
    pub age: usize,
}

/// Differential evolution and its variants.
///
/// A single runner covers DE, jDE, multi-strategy DE, dynamic population
/// DE and the DE-MTS hybrids; [`DeConfig`] selects the combination. One
/// generation:
///
/// 1. every target `i` builds one trial per strategy from the parent
///    population (with jDE control parameters adapted first) and keeps the
///    best trial,
/// 2. a trial replaces its target when it is no worse,
/// 3. the population schedule may halve the population, or, under an
///    aging schedule, add newborns and remove expired members,
/// 4. hybrids refine enabled members with MTS and re-enable the
///    lowest-graded ones.
///
/// # Examples
///
/// ```
/// use u_evolve::algorithm::Algorithm;
/// use u_evolve::de::{DeConfig, DifferentialEvolution};
/// use u_evolve::problem::{Benchmark, BenchmarkFunction};
/// use u_evolve::task::{Task, TaskConfig};
///
/// let de = DifferentialEvolution::new(
///     DeConfig::de()
///         .with_population_size(20)
///         .with_differential_weight(0.5)
///         .with_crossover_probability(0.9)
///         .with_seed(42),
/// ).unwrap();
/// assert_eq!(de.name(), "DE");
///
/// let problem = Benchmark::new(BenchmarkFunction::Sphere, 5).unwrap();
/// let mut task = Task::new(problem, TaskConfig::default().with_max_evals(10_000)).unwrap();
/// let solution = de.run(&mut task).unwrap();
/// assert!(solution.value < 1e-3);
/// ```
///
/// # References
///
/// - Storn & Price (1997), "Differential Evolution - A Simple and Efficient
///   Heuristic for Global Optimization over Continuous Spaces"
/// - Brest et al. (2008), "Population size reduction for the differential
///   evolution algorithm"
/// - Brest et al. (2013), "Population size reduction and aging in the
///   differential evolution algorithm"
#[derive(Debug, Clone)]
pub struct DifferentialEvolution {
    config: DeConfig,
    name: String,
}

impl DifferentialEvolution {
    /// Creates the algorithm after validating `config`.
    pub fn new(config: DeConfig) -> Result<Self> {
        config.validate()?;
        let name = variant_name(&config);
        Ok(Self { config, name })
    }

    /// The configuration in use.
    pub fn config(&self) -> &DeConfig {
        &self.config
    }

    fn initial_control(&self) -> ControlParams {
        ControlParams {
            f: self.config.differential_weight,
            cr: self.config.crossover_probability,
        }
    }

    fn fresh_search(&self, task: &Task) -> Option<SearchState> {
        self.config
            .local_search
            .as_ref()
            .map(|t| SearchState::new(task.range(), t.initial_range_fraction, false))
    }

    fn newborn<R: Rng + ?Sized>(&self, task: &mut Task, rng: &mut R) -> Result<Individual<DeState>> {
        let state = DeState {
            control: self.initial_control(),
            search: self.fresh_search(task),
            age: 0,
        };
        Individual::random(task, state, rng)
    }

    /// Births, aging and culling for the aging schedule. The population
    /// never ends a generation empty.
    fn age_population<R: Rng + ?Sized>(
        &self,
        aging: &Aging,
        task: &mut Task,
        population: &mut Vec<Individual<DeState>>,
        rng: &mut R,
    ) -> Result<()> {
        let np = self.config.population_size;
        let t = task.iters();

        let born = aging.births(np, t);
        for _ in 0..born {
            population.push(self.newborn(task, rng)?);
        }
        let died = aging.age(population, |state| &mut state.age);
        if population.is_empty() {
            for _ in 0..np {
                population.push(self.newborn(task, rng)?);
            }
        }
        let culled = aging.thin(population, np, t, rng);
        trace!(
            born,
            died,
            culled,
            population = population.len(),
            "population aged"
        );
        Ok(())
    }
}

/// Short name of the configured variant, e.g. `dynNpMsDE`, `ANpDE` or
/// `DEMTSv1`.
fn variant_name(config: &DeConfig) -> String {
    let mut name = String::new();
    match config.population_schedule {
        PopulationSchedule::Halving { .. } => name.push_str("dynNp"),
        PopulationSchedule::Aging(_) => name.push_str("ANp"),
        PopulationSchedule::Fixed => {}
    }
    if config.strategies.len() > 1 {
        name.push_str(if config.local_search.is_some() { "MS" } else { "Ms" });
    }
    name.push_str(if config.self_adaptation.is_some() { "jDE" } else { "DE" });
    if let Some(trajectory) = &config.local_search {
        name.push_str("MTS");
        if trajectory.local_searches.contains(&LocalSearch::Ls1v1) {
            name.push_str("v1");
        }
    }
    name
}

impl Algorithm for DifferentialEvolution {
    type State = DeState;

    fn name(&self) -> &str {
        &self.name
    }

    fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    fn init_population<R: Rng + ?Sized>(
        &self,
        task: &mut Task,
        rng: &mut R,
    ) -> Result<Vec<Individual<DeState>>> {
        (0..self.config.population_size)
            .map(|_| self.newborn(task, rng))
            .collect()
    }

    fn run_iteration<R: Rng + ?Sized>(
        &self,
        task: &mut Task,
        population: &mut Vec<Individual<DeState>>,
        best: &mut Best,
        rng: &mut R,
    ) -> Result<()> {
        // trials are built from the parent population only
        let mut trials = Vec::with_capacity(population.len());
        for i in 0..population.len() {
            let parent = population[i].state.control;
            let control = match &self.config.self_adaptation {
                Some(adaptation) => adaptation.adapt(parent, rng),
                None => parent,
            };

            let mut chosen: Option<(Vec<f64>, f64)> = None;
            for strategy in &self.config.strategies {
                let mut x =
                    strategy.trial(population.as_slice(), i, &best.x, control.f, control.cr, rng);
                task.repair(&mut x, rng);
                let f = task.eval(&x)?;
                if chosen.as_ref().map_or(true, |(_, cf)| f < *cf) {
                    chosen = Some((x, f));
                }
            }
            if let Some((x, f)) = chosen {
                trials.push((i, x, f, control));
            }
        }

        let mut replaced = 0usize;
        for (i, x, f, control) in trials {
            if f <= population[i].f {
                let search = self.fresh_search(task);
                let ind = &mut population[i];
                ind.x = x;
                ind.f = f;
                ind.state = DeState {
                    control,
                    search,
                    age: 0,
                };
                best.update(&ind.x, ind.f);
                replaced += 1;
            }
        }

        match &self.config.population_schedule {
            PopulationSchedule::Aging(aging) => self.age_population(aging, task, population, rng)?,
            schedule => {
                schedule.apply(population, task);
            }
        }

        if let Some(trajectory) = &self.config.local_search {
            for Individual { x, f, state } in population.iter_mut() {
                let Some(search) = state.search.as_mut() else {
                    continue;
                };
                if search.enabled {
                    refine(x, f, search, best, trajectory, task, rng)?;
                }
            }
            reenable_worst(
                population
                    .iter_mut()
                    .filter_map(|ind| ind.state.search.as_mut())
                    .collect(),
                trajectory.num_enabled,
            );
        }

        best.update_from_population(population);
        debug!(
            algorithm = self.name.as_str(),
            replaced,
            population = population.len(),
            best = best.f,
            "de generation"
        );
        Ok(())
    }
}
