//! Candidate solutions and best-so-far bookkeeping.
//!
//! An [`Individual`] is a point in the search box together with its signed
//! fitness and an optional per-individual algorithm state `S` (self-adapted
//! control parameters, local-search step sizes, ...). A population is a
//! plain `Vec<Individual<S>>`.

use rand::Rng;

use crate::error::Result;
use crate::task::Task;

/// One candidate solution.
///
/// `f` is the signed fitness as returned by [`Task::eval`], so lower is
/// better regardless of the optimization direction. Two individuals are
/// equal when their points and fitness values are; the attached state is
/// not compared.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual<S = ()> {
    /// Position in the search space.
    pub x: Vec<f64>,
    /// Signed fitness (`+inf` until evaluated).
    pub f: f64,
    /// Algorithm-specific state carried by this individual.
    pub state: S,
}

impl<S> Individual<S> {
    /// Wraps an unevaluated point.
    pub fn new(x: Vec<f64>, state: S) -> Self {
        Self {
            x,
            f: f64::INFINITY,
            state,
        }
    }

    /// Draws a point uniformly inside the task's bounds and evaluates it.
    pub fn random<R: Rng + ?Sized>(task: &mut Task, state: S, rng: &mut R) -> Result<Self> {
        let x = task
            .lower()
            .iter()
            .zip(task.range())
            .map(|(lo, width)| lo + rng.random::<f64>() * width)
            .collect();
        let mut individual = Self::new(x, state);
        individual.evaluate(task, rng)?;
        Ok(individual)
    }

    /// Repairs the point into the box and evaluates it, storing and
    /// returning the signed fitness.
    pub fn evaluate<R: Rng + ?Sized>(&mut self, task: &mut Task, rng: &mut R) -> Result<f64> {
        task.repair(&mut self.x, rng);
        self.f = task.eval(&self.x)?;
        Ok(self.f)
    }
}

impl<S> PartialEq for Individual<S> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.x == other.x
    }
}

/// Best-so-far point of a run.
///
/// Updated only on strict improvement, so the stored fitness never worsens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Best {
    /// Best point found.
    pub x: Vec<f64>,
    /// Its signed fitness.
    pub f: f64,
}

impl Best {
    /// Best member of a population. An empty population yields an empty
    /// point with `+inf` fitness.
    pub fn from_population<S>(population: &[Individual<S>]) -> Self {
        match best_index(population) {
            Some(i) => Self {
                x: population[i].x.clone(),
                f: population[i].f,
            },
            None => Self {
                x: Vec::new(),
                f: f64::INFINITY,
            },
        }
    }

    /// Replaces the incumbent if `f` is strictly better. Returns whether it
    /// did.
    pub fn update(&mut self, x: &[f64], f: f64) -> bool {
        if f < self.f {
            self.x.clear();
            self.x.extend_from_slice(x);
            self.f = f;
            true
        } else {
            false
        }
    }

    /// Offers the best member of `population`.
    pub fn update_from_population<S>(&mut self, population: &[Individual<S>]) -> bool {
        match best_index(population) {
            Some(i) => self.update(&population[i].x, population[i].f),
            None => false,
        }
    }
}

/// Index of the member with the lowest signed fitness. Ties go to the
/// lowest index; `None` for an empty population.
pub fn best_index<S>(population: &[Individual<S>]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.f.total_cmp(&b.f))
        .map(|(i, _)| i)
}
