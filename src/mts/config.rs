//! MTS configuration.

use super::local_search::LocalSearch;
use crate::error::{Error, Result};

/// Parameters of the per-individual trajectory search.
///
/// Shared by [`MultipleTrajectorySearch`](super::MultipleTrajectorySearch)
/// and the differential evolution hybrids that refine their population with
/// MTS after selection.
///
/// # Examples
///
/// ```
/// use u_evolve::mts::{LocalSearch, TrajectoryConfig};
///
/// let config = TrajectoryConfig::default()
///     .with_num_tests(3)
///     .with_local_searches(vec![LocalSearch::Ls1, LocalSearch::Ls3]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryConfig {
    /// Applications of each operator during the grading run.
    pub num_tests: usize,

    /// Applications of the winning operator after grading.
    pub num_searches: usize,

    /// Individuals re-enabled at the end of every generation (the ones with
    /// the lowest grades).
    pub num_enabled: usize,

    /// Grade awarded for improving the global best.
    pub bonus1: f64,

    /// Grade awarded for improving the individual itself.
    pub bonus2: f64,

    /// Operators competing in the grading run.
    pub local_searches: Vec<LocalSearch>,

    /// Fraction of the bound range a search-range component is reset to
    /// after underflowing.
    pub search_range_fix: f64,

    /// Initial search range as a fraction of the bound range.
    pub initial_range_fraction: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            num_tests: 5,
            num_searches: 5,
            num_enabled: 17,
            bonus1: 10.0,
            bonus2: 1.0,
            local_searches: vec![LocalSearch::Ls1, LocalSearch::Ls2, LocalSearch::Ls3],
            search_range_fix: 0.4,
            initial_range_fraction: 0.5,
        }
    }
}

impl TrajectoryConfig {
    /// Operator set of the second MTS generation: LS1v1, LS2.
    pub fn v1() -> Self {
        Self {
            local_searches: vec![LocalSearch::Ls1v1, LocalSearch::Ls2],
            ..Self::default()
        }
    }

    /// Settings used when MTS refines a differential evolution population:
    /// LS1, LS2, LS3 starting from a quarter of the range.
    pub fn hybrid() -> Self {
        Self {
            initial_range_fraction: 0.25,
            ..Self::default()
        }
    }

    /// Hybrid settings with the v1 operators LS1v1, LS2, LS3v1.
    pub fn hybrid_v1() -> Self {
        Self {
            local_searches: vec![LocalSearch::Ls1v1, LocalSearch::Ls2, LocalSearch::Ls3v1],
            ..Self::hybrid()
        }
    }

    /// Sets the number of grading applications per operator.
    pub fn with_num_tests(mut self, n: usize) -> Self {
        self.num_tests = n;
        self
    }

    /// Sets the number of applications of the winning operator.
    pub fn with_num_searches(mut self, n: usize) -> Self {
        self.num_searches = n;
        self
    }

    /// Sets how many individuals are re-enabled per generation.
    pub fn with_num_enabled(mut self, n: usize) -> Self {
        self.num_enabled = n;
        self
    }

    /// Sets the two grade bonuses.
    pub fn with_bonuses(mut self, bonus1: f64, bonus2: f64) -> Self {
        self.bonus1 = bonus1;
        self.bonus2 = bonus2;
        self
    }

    /// Sets the competing operators.
    pub fn with_local_searches(mut self, local_searches: Vec<LocalSearch>) -> Self {
        self.local_searches = local_searches;
        self
    }

    /// Sets the underflow reset fraction.
    pub fn with_search_range_fix(mut self, fix: f64) -> Self {
        self.search_range_fix = fix;
        self
    }

    /// Sets the initial search range fraction.
    pub fn with_initial_range_fraction(mut self, fraction: f64) -> Self {
        self.initial_range_fraction = fraction;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.local_searches.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one local search is required".into(),
            ));
        }
        if !(self.search_range_fix > 0.0 && self.search_range_fix <= 1.0) {
            return Err(Error::InvalidConfig(
                "search_range_fix must be in (0, 1]".into(),
            ));
        }
        if !(self.initial_range_fraction > 0.0 && self.initial_range_fraction <= 1.0) {
            return Err(Error::InvalidConfig(
                "initial_range_fraction must be in (0, 1]".into(),
            ));
        }
        if !self.bonus1.is_finite() || !self.bonus2.is_finite() {
            return Err(Error::InvalidConfig("bonuses must be finite".into()));
        }
        Ok(())
    }
}

/// Configuration for [`MultipleTrajectorySearch`](super::MultipleTrajectorySearch).
///
/// # Examples
///
/// ```
/// use u_evolve::mts::MtsConfig;
///
/// let config = MtsConfig::default();
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.num_searches_best, 5);
///
/// let v1 = MtsConfig::mts_v1().with_seed(7);
/// assert_eq!(v1.num_searches_best, 0);
/// assert_eq!(v1.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MtsConfig {
    /// Number of trajectories (individuals).
    pub population_size: usize,

    /// LS1 applications on the global best at the end of every generation.
    pub num_searches_best: usize,

    /// Per-individual search parameters.
    pub trajectory: TrajectoryConfig,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for MtsConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            num_searches_best: 5,
            trajectory: TrajectoryConfig::default(),
            seed: None,
        }
    }
}

impl MtsConfig {
    /// Classic MTS: LS1, LS2, LS3 plus best polishing.
    pub fn mts() -> Self {
        Self::default()
    }

    /// MTS v1: LS1v1 and LS2, no best polishing.
    pub fn mts_v1() -> Self {
        Self {
            num_searches_best: 0,
            trajectory: TrajectoryConfig::v1(),
            ..Self::default()
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of best-polishing LS1 runs.
    pub fn with_num_searches_best(mut self, n: usize) -> Self {
        self.num_searches_best = n;
        self
    }

    /// Replaces the trajectory parameters.
    pub fn with_trajectory(mut self, trajectory: TrajectoryConfig) -> Self {
        self.trajectory = trajectory;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        self.trajectory.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MtsConfig::default();
        assert_eq!(config.population_size, 40);
        assert_eq!(config.trajectory.num_tests, 5);
        assert_eq!(config.trajectory.num_searches, 5);
        assert_eq!(config.trajectory.num_enabled, 17);
        assert_eq!(config.trajectory.bonus1, 10.0);
        assert_eq!(config.trajectory.bonus2, 1.0);
        assert_eq!(config.trajectory.search_range_fix, 0.4);
        assert_eq!(config.trajectory.initial_range_fraction, 0.5);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            MtsConfig::mts_v1().trajectory.local_searches,
            vec![LocalSearch::Ls1v1, LocalSearch::Ls2]
        );
        assert_eq!(TrajectoryConfig::hybrid().initial_range_fraction, 0.25);
        assert_eq!(
            TrajectoryConfig::hybrid_v1().local_searches,
            vec![LocalSearch::Ls1v1, LocalSearch::Ls2, LocalSearch::Ls3v1]
        );
        assert!(TrajectoryConfig::hybrid_v1().validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MtsConfig::default()
            .with_population_size(10)
            .with_num_searches_best(2)
            .with_trajectory(
                TrajectoryConfig::default()
                    .with_num_tests(2)
                    .with_num_searches(3)
                    .with_num_enabled(4)
                    .with_bonuses(5.0, 0.5)
                    .with_search_range_fix(0.2)
                    .with_initial_range_fraction(0.1),
            )
            .with_seed(1);
        assert_eq!(config.population_size, 10);
        assert_eq!(config.num_searches_best, 2);
        assert_eq!(config.trajectory.num_tests, 2);
        assert_eq!(config.trajectory.num_searches, 3);
        assert_eq!(config.trajectory.num_enabled, 4);
        assert_eq!(config.trajectory.bonus1, 5.0);
        assert_eq!(config.trajectory.bonus2, 0.5);
        assert_eq!(config.trajectory.search_range_fix, 0.2);
        assert_eq!(config.trajectory.initial_range_fraction, 0.1);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_validate() {
        assert!(MtsConfig::default().with_population_size(0).validate().is_err());
        assert!(TrajectoryConfig::default()
            .with_local_searches(Vec::new())
            .validate()
            .is_err());
        assert!(TrajectoryConfig::default()
            .with_search_range_fix(0.0)
            .validate()
            .is_err());
        assert!(TrajectoryConfig::default()
            .with_initial_range_fraction(1.5)
            .validate()
            .is_err());
        assert!(TrajectoryConfig::default()
            .with_bonuses(f64::NAN, 1.0)
            .validate()
            .is_err());
    }
}
