//! Control-parameter self-adaptation (jDE) and population-size schedules
//! (halving and aging).

use rand::seq::index::sample;
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::task::Task;

/// Scale factor and crossover rate carried by one individual.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlParams {
    /// Scale factor `F`.
    pub f: f64,
    /// Crossover rate `CR`.
    pub cr: f64,
}

/// jDE self-adaptation of `F` and `CR`.
///
/// Before producing its trial, every individual re-rolls `F` with
/// probability `tao1` (uniform in `[f_lower, f_upper]`) and `CR` with
/// probability `tao2` (uniform in `[0, 1]`); otherwise it keeps its own
/// values. A trial that wins selection passes the adapted values on.
///
/// # References
///
/// - Brest et al. (2006), "Self-Adapting Control Parameters in Differential
///   Evolution: A Comparative Study on Numerical Benchmark Problems"
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfAdaptation {
    /// Lower bound for re-rolled `F`.
    pub f_lower: f64,
    /// Upper bound for re-rolled `F`.
    pub f_upper: f64,
    /// Probability of re-rolling `F`.
    pub tao1: f64,
    /// Probability of re-rolling `CR`.
    pub tao2: f64,
}

impl Default for SelfAdaptation {
    fn default() -> Self {
        Self {
            f_lower: 0.0,
            f_upper: 1.0,
            tao1: 0.4,
            tao2: 0.2,
        }
    }
}

impl SelfAdaptation {
    /// Returns the (possibly re-rolled) parameters for the next trial.
    pub fn adapt<R: Rng + ?Sized>(&self, parent: ControlParams, rng: &mut R) -> ControlParams {
        let f = if rng.random::<f64>() < self.tao1 {
            self.f_lower + rng.random::<f64>() * (self.f_upper - self.f_lower)
        } else {
            parent.f
        };
        let cr = if rng.random::<f64>() < self.tao2 {
            rng.random::<f64>()
        } else {
            parent.cr
        };
        ControlParams { f, cr }
    }

    /// Validates the adaptation ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.f_lower.is_finite() || !self.f_upper.is_finite() || self.f_lower > self.f_upper {
            return Err(Error::InvalidConfig(
                "self-adaptation requires finite f_lower <= f_upper".into(),
            ));
        }
        for (name, p) in [("tao1", self.tao1), ("tao2", self.tao2)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!("{name} must be in [0, 1]")));
            }
        }
        Ok(())
    }
}

/// How the population size evolves over a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopulationSchedule {
    /// Constant population size.
    #[default]
    Fixed,

    /// Halve the population at scheduled generations.
    ///
    /// With the current size `N`, the next halving happens in the
    /// generation that sees `iters == max_evals / (p_max * N) + rp`
    /// (integer division). Halving keeps the better of `pop[i]` and
    /// `pop[i + N/2]` for every `i < N/2` and only applies while `N > 3`.
    /// Without an evaluation budget the population never shrinks.
    Halving {
        /// Number of planned population reductions.
        p_max: usize,
        /// Generation offset of every halving.
        rp: usize,
    },

    /// Individuals age and die; the population grows and shrinks around
    /// its initial size.
    Aging(Aging),
}

impl PopulationSchedule {
    /// Iteration counter value at which a population of `size`
    /// individuals is halved.
    pub fn halving_generation(&self, max_evals: Option<usize>, size: usize) -> Option<usize> {
        match *self {
            PopulationSchedule::Fixed | PopulationSchedule::Aging(_) => None,
            PopulationSchedule::Halving { p_max, rp } => {
                let max_evals = max_evals?;
                let denominator = p_max.checked_mul(size).filter(|&d| d > 0)?;
                Some(max_evals / denominator + rp)
            }
        }
    }

    /// Halves `population` if this generation is scheduled. Returns whether
    /// it did. Only [`Halving`](PopulationSchedule::Halving) ever halves.
    pub fn apply<S>(&self, population: &mut Vec<Individual<S>>, task: &Task) -> bool {
        let size = population.len();
        if size <= 3 {
            return false;
        }
        let Some(generation) = self.halving_generation(task.max_evals(), size) else {
            return false;
        };
        if task.iters() != generation {
            return false;
        }

        let half = size / 2;
        let second = population.split_off(half);
        for (first, other) in population.iter_mut().zip(second) {
            if !(first.f < other.f) {
                *first = other;
            }
        }
        debug!(
            from = size,
            to = half,
            iteration = task.iters(),
            "population halved"
        );
        true
    }

    /// Validates the schedule.
    pub fn validate(&self) -> Result<()> {
        match self {
            PopulationSchedule::Fixed => Ok(()),
            PopulationSchedule::Halving { p_max, .. } => {
                if *p_max == 0 {
                    return Err(Error::InvalidConfig("p_max must be at least 1".into()));
                }
                Ok(())
            }
            PopulationSchedule::Aging(aging) => aging.validate(),
        }
    }
}

/// Aging population (ANpDE).
///
/// Every generation, `max(1, round(NP * delta_np * |sin t|))` fresh random
/// individuals are born. Each member then ages by one and dies once its
/// age exceeds its lifetime, which is proportional to how good it is:
/// `min(min_lifetime + mu * avg / f, max_lifetime)` with `mu` half the
/// lifetime span and `avg` the mean finite fitness. If nobody survives the
/// population restarts from `NP` random members. While the population is
/// larger than `NP`, `max(1, round(NP * delta_np * |cos t|))` members are
/// picked and each dies with probability `omega`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aging {
    /// Shortest lifetime in generations.
    pub min_lifetime: usize,
    /// Longest lifetime in generations.
    pub max_lifetime: usize,
    /// Birth and culling rate relative to `NP`.
    pub delta_np: f64,
    /// Probability that a picked member dies when culling.
    pub omega: f64,
}

impl Default for Aging {
    fn default() -> Self {
        Self {
            min_lifetime: 0,
            max_lifetime: 12,
            delta_np: 0.3,
            omega: 0.3,
        }
    }
}

impl Aging {
    fn mu(&self) -> f64 {
        self.min_lifetime.abs_diff(self.max_lifetime) as f64 / 2.0
    }

    /// Lifetime of a member with signed fitness `f` in a population whose
    /// mean finite fitness is `avg`.
    pub fn lifetime(&self, f: f64, avg: f64) -> usize {
        if !avg.is_finite() {
            return self.max_lifetime;
        }
        let lifetime = (self.min_lifetime as f64 + self.mu() * avg / f).min(self.max_lifetime as f64);
        if lifetime.is_nan() {
            self.max_lifetime
        } else {
            lifetime.round().max(0.0) as usize
        }
    }

    /// Members born in generation `t` for a nominal size `np`.
    pub fn births(&self, np: usize, t: usize) -> usize {
        Self::rate(np, self.delta_np * (t as f64).sin().abs())
    }

    /// Members picked for culling in generation `t`.
    pub fn deaths(&self, np: usize, t: usize) -> usize {
        Self::rate(np, self.delta_np * (t as f64).cos().abs())
    }

    fn rate(np: usize, fraction: f64) -> usize {
        ((np as f64 * fraction).round() as usize).max(1)
    }

    /// Ages every member by one generation and removes the expired ones.
    /// Returns the number of members removed.
    pub fn age<S>(
        &self,
        population: &mut Vec<Individual<S>>,
        age: impl Fn(&mut S) -> &mut usize,
    ) -> usize {
        let finite: Vec<f64> = population
            .iter()
            .map(|ind| ind.f)
            .filter(|f| f.is_finite())
            .collect();
        let avg = if finite.is_empty() {
            f64::INFINITY
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };

        let before = population.len();
        population.retain_mut(|ind| {
            let lifetime = self.lifetime(ind.f, avg);
            let years = age(&mut ind.state);
            *years += 1;
            *years <= lifetime
        });
        before - population.len()
    }

    /// Culls an oversized population. At least one member always survives.
    /// Returns the number of members removed.
    pub fn thin<S, R: Rng + ?Sized>(
        &self,
        population: &mut Vec<Individual<S>>,
        np: usize,
        t: usize,
        rng: &mut R,
    ) -> usize {
        let size = population.len();
        let picked = self.deaths(np, t);
        if size <= np || size <= picked {
            return 0;
        }
        let mut doomed = vec![false; size];
        for i in sample(&mut *rng, size, picked) {
            doomed[i] = rng.random::<f64>() < self.omega;
        }
        let mut flags = doomed.into_iter();
        population.retain(|_| !flags.next().unwrap_or(false));
        size - population.len()
    }

    /// Validates the aging parameters.
    pub fn validate(&self) -> Result<()> {
        if self.min_lifetime > self.max_lifetime {
            return Err(Error::InvalidConfig(
                "min_lifetime must not exceed max_lifetime".into(),
            ));
        }
        if !self.delta_np.is_finite() || self.delta_np < 0.0 {
            return Err(Error::InvalidConfig(
                "delta_np must be finite and non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.omega) {
            return Err(Error::InvalidConfig("omega must be in [0, 1]".into()));
        }
        Ok(())
    }
}
