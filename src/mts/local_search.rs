//! The MTS local-search operators.
//!
//! Each operator refines one [`SearchPoint`] in place, offers every
//! evaluated point to the global [`Best`] and returns the grade it earned:
//! `bonus1` per global-best improvement, `bonus2` per improvement of the
//! point itself.
//!
//! # References
//!
//! - Tseng & Chen (2008), "Multiple trajectory search for Large Scale Global
//!   Optimization", IEEE CEC 2008
//! - Tseng & Chen (2009), "Multiple trajectory search for unconstrained /
//!   constrained multi-objective optimization", IEEE CEC 2009

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::TrajectoryConfig;
use crate::error::Result;
use crate::individual::Best;
use crate::task::Task;

/// Search-range components below this value are reset.
pub const SEARCH_RANGE_UNDERFLOW: f64 = 1e-15;

/// Candidates generated per LS3v1 round.
const LS3V1_PHI: usize = 3;

/// LS3v1 stops once every displacement is at most this small.
const LS3V1_MIN_DISPLACEMENT: f64 = 1e-3;

/// A point under local search together with its step sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPoint {
    /// Current position.
    pub x: Vec<f64>,
    /// Signed fitness of `x`.
    pub f: f64,
    /// Whether the last operator application improved the point.
    pub improved: bool,
    /// Per-dimension step size.
    pub search_range: Vec<f64>,
}

impl SearchPoint {
    /// Halves the search range if the last application did not improve the
    /// point. Components that underflow are reset to `range * fix`.
    pub fn shrink_if_stalled(&mut self, range: &[f64], fix: f64) {
        if self.improved {
            return;
        }
        for (sr, width) in self.search_range.iter_mut().zip(range) {
            *sr /= 2.0;
            if *sr < SEARCH_RANGE_UNDERFLOW {
                *sr = width * fix;
            }
        }
    }
}

/// MTS local-search operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalSearch {
    /// Coordinate search: step `-sr_i`, then `+sr_i / 2`.
    Ls1,
    /// LS1 with a random scale `d_i ~ U(-1, 1)` on the first step.
    Ls1v1,
    /// Random-subspace search: each dimension moves with probability 1/4,
    /// by `∓ sr_i * d_i`.
    Ls2,
    /// Three-point finite-difference step per dimension.
    Ls3,
    /// Permuted random candidates with shrinking displacement.
    Ls3v1,
}

impl LocalSearch {
    /// Applies the operator to `point` and returns the earned grade.
    ///
    /// # Errors
    /// Only budget errors from a throwing task.
    pub fn apply<R: Rng + ?Sized>(
        self,
        point: &mut SearchPoint,
        best: &mut Best,
        config: &TrajectoryConfig,
        task: &mut Task,
        rng: &mut R,
    ) -> Result<f64> {
        match self {
            LocalSearch::Ls1 => ls1(point, best, config, task, rng, false),
            LocalSearch::Ls1v1 => ls1(point, best, config, task, rng, true),
            LocalSearch::Ls2 => ls2(point, best, config, task, rng),
            LocalSearch::Ls3 => ls3(point, best, config, task, rng),
            LocalSearch::Ls3v1 => ls3v1(point, best, config, task, rng),
        }
    }
}

/// Evaluates `x` after repair, offering it to the global best.
fn try_point<R: Rng + ?Sized>(
    x: &mut [f64],
    best: &mut Best,
    task: &mut Task,
    rng: &mut R,
) -> Result<(f64, bool)> {
    task.repair(x, rng);
    let f = task.eval(x)?;
    let global = best.update(x, f);
    Ok((f, global))
}

fn ls1<R: Rng + ?Sized>(
    point: &mut SearchPoint,
    best: &mut Best,
    config: &TrajectoryConfig,
    task: &mut Task,
    rng: &mut R,
    scaled: bool,
) -> Result<f64> {
    point.shrink_if_stalled(task.range(), config.search_range_fix);
    point.improved = false;
    let mut grade = 0.0;

    let scale: Vec<f64> = if scaled {
        (0..point.x.len())
            .map(|_| rng.random_range(-1.0..1.0))
            .collect()
    } else {
        vec![1.0; point.x.len()]
    };

    for i in 0..point.x.len() {
        let old = point.x[i];
        let sr = point.search_range[i];

        point.x[i] = old - sr * scale[i];
        let (mut f, mut global) = try_point(&mut point.x, best, task, rng)?;
        if global {
            grade += config.bonus1;
        }

        if f > point.f {
            point.x[i] = old + 0.5 * sr;
            (f, global) = try_point(&mut point.x, best, task, rng)?;
            if global {
                grade += config.bonus1;
            }
        }

        if f < point.f {
            grade += config.bonus2;
            point.f = f;
            point.improved = true;
        } else {
            point.x[i] = old;
        }
    }
    Ok(grade)
}

fn ls2<R: Rng + ?Sized>(
    point: &mut SearchPoint,
    best: &mut Best,
    config: &TrajectoryConfig,
    task: &mut Task,
    rng: &mut R,
) -> Result<f64> {
    point.shrink_if_stalled(task.range(), config.search_range_fix);
    point.improved = false;
    let mut grade = 0.0;
    let dim = point.x.len();

    for _ in 0..dim {
        let step: Vec<f64> = (0..dim)
            .map(|j| {
                let d = rng.random_range(-1.0..1.0);
                if rng.random_range(0..4) == 0 {
                    point.search_range[j] * d
                } else {
                    0.0
                }
            })
            .collect();

        let mut candidate: Vec<f64> = point.x.iter().zip(&step).map(|(x, s)| x - s).collect();
        let (mut f, mut global) = try_point(&mut candidate, best, task, rng)?;

        if f > point.f {
            candidate = point.x.iter().zip(&step).map(|(x, s)| x + s).collect();
            (f, global) = try_point(&mut candidate, best, task, rng)?;
        }

        if f < point.f {
            grade += if global { config.bonus1 } else { config.bonus2 };
            point.x = candidate;
            point.f = f;
            point.improved = true;
        }
    }
    Ok(grade)
}

fn ls3<R: Rng + ?Sized>(
    point: &mut SearchPoint,
    best: &mut Best,
    config: &TrajectoryConfig,
    task: &mut Task,
    rng: &mut R,
) -> Result<f64> {
    point.improved = false;
    let mut grade = 0.0;
    let mut moving = point.x.clone();

    for i in 0..moving.len() {
        let mut deltas = [0.0; 3];
        for (delta, offset) in deltas.iter_mut().zip([0.1, -0.1, 0.2]) {
            let mut x = moving.clone();
            x[i] += offset;
            let (f, global) = try_point(&mut x, best, task, rng)?;
            if global {
                grade += config.bonus1;
                point.improved = true;
            }
            if f.is_finite() && point.f.is_finite() {
                *delta = point.f - f;
            }
            if *delta > 0.0 {
                grade += config.bonus2;
                point.improved = true;
            }
        }
        let [d1, d2, d3] = deltas;

        let a = 0.4 + rng.random::<f64>() * 0.1;
        let b = 0.1 + rng.random::<f64>() * 0.2;
        let c = rng.random::<f64>();
        moving[i] += a * (d1 - d2) + b * (d3 - 2.0 * d1) + c;

        let (f, global) = try_point(&mut moving, best, task, rng)?;
        if f < point.f {
            grade += if global { config.bonus1 } else { config.bonus2 };
            point.x.copy_from_slice(&moving);
            point.f = f;
            point.improved = true;
        }
    }
    Ok(grade)
}

fn ls3v1<R: Rng + ?Sized>(
    point: &mut SearchPoint,
    best: &mut Best,
    config: &TrajectoryConfig,
    task: &mut Task,
    rng: &mut R,
) -> Result<f64> {
    point.improved = false;
    let mut grade = 0.0;
    let mut displacement: Vec<f64> = task.range().iter().map(|r| r / 10.0).collect();

    while displacement.iter().any(|&d| d > LS3V1_MIN_DISPLACEMENT) {
        let mut winner: Option<(Vec<f64>, f64)> = None;
        for _ in 0..LS3V1_PHI {
            let mut x = point.x.clone();
            x.shuffle(rng);
            for (v, d) in x.iter_mut().zip(&displacement) {
                *v += d * rng.random_range(-1.0..1.0);
            }
            let (f, global) = try_point(&mut x, best, task, rng)?;
            if f < point.f {
                grade += if global { config.bonus1 } else { config.bonus2 };
                if winner.as_ref().map_or(true, |(_, wf)| f < *wf) {
                    winner = Some((x, f));
                }
            }
        }
        if let Some((x, f)) = winner {
            point.x = x;
            point.f = f;
            point.improved = true;
        }

        for (((d, x), lo), hi) in displacement
            .iter_mut()
            .zip(&point.x)
            .zip(task.lower())
            .zip(task.upper())
        {
            let upper = hi.min(x + 2.0 * *d);
            let lower = lo.max(x - 2.0 * *d);
            *d = (upper - lower) / 10.0;
        }
    }
    Ok(grade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Benchmark, BenchmarkFunction};
    use crate::task::TaskConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL: [LocalSearch; 5] = [
        LocalSearch::Ls1,
        LocalSearch::Ls1v1,
        LocalSearch::Ls2,
        LocalSearch::Ls3,
        LocalSearch::Ls3v1,
    ];

    fn sphere_task(max_evals: usize) -> Task {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 4).unwrap();
        Task::new(problem, TaskConfig::default().with_max_evals(max_evals)).unwrap()
    }

    fn start(task: &mut Task) -> (SearchPoint, Best) {
        let x = vec![3.0, -2.0, 1.5, 4.0];
        let f = task.eval(&x).unwrap();
        let point = SearchPoint {
            x: x.clone(),
            f,
            improved: true,
            search_range: task.range().iter().map(|r| r / 2.0).collect(),
        };
        (point, Best { x, f })
    }

    // ---- search range bookkeeping ----

    #[test]
    fn test_shrink_only_when_stalled() {
        let mut point = SearchPoint {
            x: vec![0.0; 2],
            f: 0.0,
            improved: true,
            search_range: vec![1.0, 2.0],
        };
        point.shrink_if_stalled(&[10.0, 10.0], 0.4);
        assert_eq!(point.search_range, vec![1.0, 2.0]);

        point.improved = false;
        point.shrink_if_stalled(&[10.0, 10.0], 0.4);
        assert_eq!(point.search_range, vec![0.5, 1.0]);
    }

    #[test]
    fn test_underflow_resets_to_range_fraction() {
        let mut point = SearchPoint {
            x: vec![0.0; 3],
            f: 0.0,
            improved: false,
            search_range: vec![1.5e-15, 1.0, 0.0],
        };
        point.shrink_if_stalled(&[10.0, 10.0, 4.0], 0.4);
        assert_eq!(point.search_range, vec![4.0, 0.5, 1.6]);
    }

    #[test]
    fn test_repeated_stalls_never_freeze() {
        let mut point = SearchPoint {
            x: vec![0.0],
            f: 0.0,
            improved: false,
            search_range: vec![1.0],
        };
        for _ in 0..200 {
            point.shrink_if_stalled(&[2.0], 0.4);
            assert!(point.search_range[0] >= SEARCH_RANGE_UNDERFLOW);
        }
    }

    // ---- operators ----

    #[test]
    fn test_operators_never_worsen_point() {
        for ls in ALL {
            let mut task = sphere_task(10_000);
            let mut rng = StdRng::seed_from_u64(11);
            let config = TrajectoryConfig::default();
            let (mut point, mut best) = start(&mut task);
            let initial = point.f;
            for _ in 0..5 {
                let before = point.f;
                ls.apply(&mut point, &mut best, &config, &mut task, &mut rng)
                    .unwrap();
                assert!(point.f <= before, "{ls:?} worsened the point");
                assert!(task.is_feasible(&point.x), "{ls:?} left the box");
                assert_eq!(task.eval(&point.x).unwrap(), point.f, "{ls:?} lost sync");
            }
            assert!(point.f < initial, "{ls:?} made no progress on sphere");
            assert!(best.f <= point.f);
        }
    }

    #[test]
    fn test_grade_rewards_improvements() {
        let mut task = sphere_task(10_000);
        let mut rng = StdRng::seed_from_u64(3);
        let config = TrajectoryConfig::default();
        let (mut point, mut best) = start(&mut task);
        let grade = LocalSearch::Ls1
            .apply(&mut point, &mut best, &config, &mut task, &mut rng)
            .unwrap();
        // moving every coordinate towards zero improves the global best
        assert!(grade >= config.bonus1);
        assert!(point.improved);
        assert_eq!(best.f, point.f);
    }

    #[test]
    fn test_ls1_coordinate_steps() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 2).unwrap();
        let mut task = Task::new(problem, TaskConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let config = TrajectoryConfig::default();
        let mut point = SearchPoint {
            x: vec![1.0, -1.0],
            f: 2.0,
            improved: true,
            search_range: vec![1.0, 1.0],
        };
        let mut best = Best {
            x: vec![1.0, -1.0],
            f: 2.0,
        };
        LocalSearch::Ls1
            .apply(&mut point, &mut best, &config, &mut task, &mut rng)
            .unwrap();
        // x0: 1 - 1 = 0 improves; x1: -1 - 1 = -2 worsens, -1 + 0.5 = -0.5 improves
        assert_eq!(point.x, vec![0.0, -0.5]);
        assert_eq!(point.f, 0.25);
        assert_eq!(best.f, 0.25);
        assert_eq!(task.evals(), 3);
    }

    #[test]
    fn test_exhausted_task_leaves_point_untouched() {
        for ls in ALL {
            let mut task = sphere_task(1);
            let mut rng = StdRng::seed_from_u64(5);
            let config = TrajectoryConfig::default();
            let (mut point, mut best) = start(&mut task);
            let before = point.clone();
            let grade = ls
                .apply(&mut point, &mut best, &config, &mut task, &mut rng)
                .unwrap();
            assert_eq!(grade, 0.0, "{ls:?}");
            assert_eq!(point.x, before.x, "{ls:?}");
            assert_eq!(point.f, before.f, "{ls:?}");
            assert_eq!(task.evals(), 1);
        }
    }

    #[test]
    fn test_throwing_task_propagates() {
        let problem = Benchmark::new(BenchmarkFunction::Sphere, 4).unwrap();
        let config = TaskConfig::default().with_max_evals(3).throwing();
        let mut task = Task::new(problem, config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let (mut point, mut best) = start(&mut task);
        let err = LocalSearch::Ls3
            .apply(
                &mut point,
                &mut best,
                &TrajectoryConfig::default(),
                &mut task,
                &mut rng,
            )
            .unwrap_err();
        assert!(err.is_budget_exhausted());
    }
}
