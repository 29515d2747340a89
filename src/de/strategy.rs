//! Mutation strategies and binomial crossover.
//!
//! Every strategy builds a mutant from population members, then mixes it
//! with the target through [`binomial_crossover`]. All of them share the
//! signature `(population, i, best, F, CR, rng) -> trial`.
//!
//! # References
//!
//! - Storn & Price (1997), "Differential Evolution - A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces"

use rand::seq::SliceRandom;
use rand::Rng;

use crate::individual::Individual;

/// DE mutation strategy.
///
/// `x_rk` are donors drawn from the population, `x_i` is the target and
/// `x_best` the best-so-far point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// DE/rand/1: `x_r1 + F (x_r2 - x_r3)`.
    Rand1,
    /// DE/best/1: `x_best + F (x_r1 - x_r2)`.
    Best1,
    /// DE/rand/2: `x_r1 + F (x_r2 - x_r3) + F (x_r4 - x_r5)`.
    Rand2,
    /// DE/best/2: `x_best + F (x_r1 - x_r2) + F (x_r3 - x_r4)`.
    Best2,
    /// DE/current-to-rand/1: `x_i + F (x_r1 - x_r2) + F (x_r3 - x_r4)`.
    CurrentToRand1,
    /// DE/current-to-best/1: `x_i + F (x_best - x_r1) + F (x_r2 - x_r3)`.
    CurrentToBest1,
}

impl Strategy {
    /// Number of donors the strategy draws.
    pub fn donors(self) -> usize {
        match self {
            Strategy::Best1 => 2,
            Strategy::Rand1 | Strategy::CurrentToBest1 => 3,
            Strategy::Best2 | Strategy::CurrentToRand1 => 4,
            Strategy::Rand2 => 5,
        }
    }

    /// Builds the trial vector for target `i`.
    ///
    /// The result is not repaired; callers repair it before evaluation.
    pub fn trial<S, R: Rng + ?Sized>(
        self,
        population: &[Individual<S>],
        i: usize,
        best: &[f64],
        f: f64,
        cr: f64,
        rng: &mut R,
    ) -> Vec<f64> {
        let r = donor_indices(population.len(), i, self.donors(), rng);
        let d = |k: usize| population[r[k]].x.as_slice();
        let target = population[i].x.as_slice();

        let mutant: Vec<f64> = (0..target.len())
            .map(|j| match self {
                Strategy::Rand1 => d(0)[j] + f * (d(1)[j] - d(2)[j]),
                Strategy::Best1 => best[j] + f * (d(0)[j] - d(1)[j]),
                Strategy::Rand2 => {
                    d(0)[j] + f * (d(1)[j] - d(2)[j]) + f * (d(3)[j] - d(4)[j])
                }
                Strategy::Best2 => best[j] + f * (d(0)[j] - d(1)[j]) + f * (d(2)[j] - d(3)[j]),
                Strategy::CurrentToRand1 => {
                    target[j] + f * (d(0)[j] - d(1)[j]) + f * (d(2)[j] - d(3)[j])
                }
                Strategy::CurrentToBest1 => {
                    target[j] + f * (best[j] - d(0)[j]) + f * (d(1)[j] - d(2)[j])
                }
            })
            .collect();

        binomial_crossover(target, &mutant, cr, rng)
    }
}

/// Draws `count` donor indices from `0..pool`.
///
/// Donors are distinct and never equal to `exclude` when the pool is large
/// enough. A pool of exactly `count` yields a permutation that may contain
/// `exclude`; a smaller pool is sampled with replacement.
pub fn donor_indices<R: Rng + ?Sized>(
    pool: usize,
    exclude: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if pool < count {
        return (0..count).map(|_| rng.random_range(0..pool)).collect();
    }
    let mut idxs: Vec<usize> = (0..pool).collect();
    idxs.shuffle(rng);
    if pool == count {
        return idxs;
    }
    idxs.into_iter()
        .filter(|&idx| idx != exclude)
        .take(count)
        .collect()
}

/// Binomial crossover.
///
/// Each component comes from `mutant` with probability `cr`, otherwise from
/// `target`. One uniformly chosen component always comes from `mutant`, so
/// the trial differs from the target whenever the mutant does.
pub fn binomial_crossover<R: Rng + ?Sized>(
    target: &[f64],
    mutant: &[f64],
    cr: f64,
    rng: &mut R,
) -> Vec<f64> {
    let n = target.len();
    let jrand = rng.random_range(0..n);
    let mut trial = target.to_vec();
    for j in 0..n {
        if j == jrand || rng.random::<f64>() < cr {
            trial[j] = mutant[j];
        }
    }
    trial
}
