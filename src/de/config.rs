//! Differential evolution configuration.

use super::adaptation::{Aging, PopulationSchedule, SelfAdaptation};
use super::strategy::Strategy;
use crate::error::{Error, Result};
use crate::mts::TrajectoryConfig;

/// Configuration for [`DifferentialEvolution`](super::DifferentialEvolution).
///
/// One struct covers the whole family; the presets set the combination of
/// strategies, self-adaptation, population schedule and MTS refinement
/// that each named variant uses.
///
/// # Examples
///
/// ```
/// use u_evolve::de::{DeConfig, PopulationSchedule, Strategy};
///
/// let config = DeConfig::default()
///     .with_population_size(30)
///     .with_strategy(Strategy::Best1)
///     .with_seed(42);
/// assert_eq!(config.strategies, vec![Strategy::Best1]);
///
/// let dyn_np = DeConfig::dyn_np_de();
/// assert_eq!(dyn_np.population_size, 10);
/// assert_eq!(dyn_np.population_schedule, PopulationSchedule::Halving { p_max: 50, rp: 3 });
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeConfig {
    /// Initial population size (NP).
    pub population_size: usize,

    /// Scale factor `F` (initial value when self-adapting).
    pub differential_weight: f64,

    /// Crossover rate `CR` (initial value when self-adapting).
    pub crossover_probability: f64,

    /// Mutation strategies. With more than one, every strategy builds a
    /// trial per target and the best trial competes in selection.
    pub strategies: Vec<Strategy>,

    /// jDE parameter adaptation, if any.
    pub self_adaptation: Option<SelfAdaptation>,

    /// Population size schedule.
    pub population_schedule: PopulationSchedule,

    /// MTS refinement after selection, if any.
    pub local_search: Option<TrajectoryConfig>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            differential_weight: 1.0,
            crossover_probability: 0.8,
            strategies: vec![Strategy::Rand1],
            self_adaptation: None,
            population_schedule: PopulationSchedule::Fixed,
            local_search: None,
            seed: None,
        }
    }
}

const MULTI_STRATEGIES: [Strategy; 4] = [
    Strategy::Rand1,
    Strategy::Best1,
    Strategy::CurrentToBest1,
    Strategy::Rand2,
];

const MULTI_STRATEGIES_JDE: [Strategy; 5] = [
    Strategy::CurrentToRand1,
    Strategy::CurrentToBest1,
    Strategy::Rand1,
    Strategy::Best1,
    Strategy::Best2,
];

impl DeConfig {
    // ---- presets ----

    /// DE/rand/1/bin.
    pub fn de() -> Self {
        Self::default()
    }

    /// Self-adaptive jDE.
    pub fn jde() -> Self {
        Self {
            differential_weight: 2.0,
            crossover_probability: 0.5,
            self_adaptation: Some(SelfAdaptation::default()),
            ..Self::default()
        }
    }

    /// Multi-strategy DE.
    pub fn ms_de() -> Self {
        Self {
            population_size: 40,
            strategies: MULTI_STRATEGIES.to_vec(),
            ..Self::default()
        }
    }

    /// Multi-strategy jDE.
    pub fn ms_jde() -> Self {
        Self {
            strategies: MULTI_STRATEGIES_JDE.to_vec(),
            ..Self::jde()
        }
    }

    /// DE with a halving population.
    pub fn dyn_np_de() -> Self {
        Self {
            population_size: 10,
            population_schedule: PopulationSchedule::Halving { p_max: 50, rp: 3 },
            ..Self::default()
        }
    }

    /// jDE with a halving population.
    pub fn dyn_np_jde() -> Self {
        Self {
            population_size: 40,
            population_schedule: PopulationSchedule::Halving { p_max: 50, rp: 3 },
            ..Self::jde()
        }
    }

    /// DE with an aging population (ANpDE).
    pub fn aging_np_de() -> Self {
        Self {
            population_schedule: PopulationSchedule::Aging(Aging::default()),
            ..Self::default()
        }
    }

    /// Multi-strategy DE with a halving population.
    pub fn dyn_np_ms_de() -> Self {
        Self {
            population_schedule: PopulationSchedule::Halving { p_max: 50, rp: 3 },
            ..Self::ms_de()
        }
    }

    /// DE followed by MTS refinement every generation.
    pub fn de_mts() -> Self {
        Self {
            population_size: 40,
            local_search: Some(TrajectoryConfig::hybrid()),
            ..Self::default()
        }
    }

    /// DE-MTS using the v1 operators.
    pub fn de_mts_v1() -> Self {
        Self {
            local_search: Some(TrajectoryConfig::hybrid_v1()),
            ..Self::de_mts()
        }
    }

    /// DE-MTS with a halving population.
    pub fn dyn_np_de_mts() -> Self {
        Self {
            population_schedule: PopulationSchedule::Halving { p_max: 10, rp: 3 },
            ..Self::de_mts()
        }
    }

    /// dynNp-DE-MTS using the v1 operators.
    pub fn dyn_np_de_mts_v1() -> Self {
        Self {
            local_search: Some(TrajectoryConfig::hybrid_v1()),
            ..Self::dyn_np_de_mts()
        }
    }

    /// Multi-strategy DE with MTS refinement.
    pub fn ms_de_mts() -> Self {
        Self {
            local_search: Some(TrajectoryConfig::hybrid()),
            ..Self::ms_de()
        }
    }

    /// MsDE-MTS using the v1 operators.
    pub fn ms_de_mts_v1() -> Self {
        Self {
            local_search: Some(TrajectoryConfig::hybrid_v1()),
            ..Self::ms_de()
        }
    }

    /// Multi-strategy DE with a halving population and MTS refinement.
    pub fn dyn_np_ms_de_mts() -> Self {
        Self {
            population_schedule: PopulationSchedule::Halving { p_max: 10, rp: 3 },
            ..Self::ms_de_mts()
        }
    }

    /// dynNp-MsDE-MTS using the v1 operators.
    pub fn dyn_np_ms_de_mts_v1() -> Self {
        Self {
            local_search: Some(TrajectoryConfig::hybrid_v1()),
            ..Self::dyn_np_ms_de_mts()
        }
    }

    // ---- builders ----

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the scale factor `F`.
    pub fn with_differential_weight(mut self, f: f64) -> Self {
        self.differential_weight = f;
        self
    }

    /// Sets the crossover rate `CR`.
    pub fn with_crossover_probability(mut self, cr: f64) -> Self {
        self.crossover_probability = cr;
        self
    }

    /// Uses a single mutation strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategies = vec![strategy];
        self
    }

    /// Sets the mutation strategies.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Enables jDE parameter adaptation.
    pub fn with_self_adaptation(mut self, adaptation: SelfAdaptation) -> Self {
        self.self_adaptation = Some(adaptation);
        self
    }

    /// Sets the population schedule.
    pub fn with_population_schedule(mut self, schedule: PopulationSchedule) -> Self {
        self.population_schedule = schedule;
        self
    }

    /// Enables MTS refinement after selection.
    pub fn with_local_search(mut self, trajectory: TrajectoryConfig) -> Self {
        self.local_search = Some(trajectory);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 4 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 4".into(),
            ));
        }
        if !self.differential_weight.is_finite() || self.differential_weight < 0.0 {
            return Err(Error::InvalidConfig(
                "differential_weight must be finite and non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(Error::InvalidConfig(
                "crossover_probability must be in [0, 1]".into(),
            ));
        }
        if self.strategies.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one strategy is required".into(),
            ));
        }
        if let Some(adaptation) = &self.self_adaptation {
            adaptation.validate()?;
        }
        self.population_schedule.validate()?;
        if let Some(trajectory) = &self.local_search {
            trajectory.validate()?;
        }
        Ok(())
    }
}
