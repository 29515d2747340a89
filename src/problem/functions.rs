//! Classic continuous benchmark functions.
//!
//! Each function is a pure formula with conventional default bounds.
//! [`Benchmark`] binds a function to a dimension and a bounded box so it
//! can be handed to a [`Task`](crate::task::Task).
//!
//! # References
//!
//! - Jamil & Yang (2013), "A Literature Survey of Benchmark Functions for
//!   Global Optimization Problems"

use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

use super::types::{validate_bounds, Bound, Problem};
use crate::error::{Error, Result};

/// Benchmark objective functions, all minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BenchmarkFunction {
    /// `sum(x_i^2)`, minimum 0 at the origin. Default box `[-5.12, 5.12]`.
    Sphere,
    /// `sum(100 (x_{i+1} - x_i^2)^2 + (1 - x_i)^2)`, minimum 0 at `(1,...,1)`.
    /// Default box `[-30, 30]`.
    Rosenbrock,
    /// `10 D + sum(x_i^2 - 10 cos(2 pi x_i))`, minimum 0 at the origin.
    /// Default box `[-5.12, 5.12]`.
    Rastrigin,
    /// `418.9829 D - sum(x_i sin(sqrt|x_i|))`, minimum ~0 at `420.968746`.
    /// Default box `[-500, 500]`.
    Schwefel,
    /// Ackley with `a = 20, b = 0.2, c = 2 pi`, minimum 0 at the origin.
    /// Default box `[-32.768, 32.768]`.
    Ackley,
    /// `sum(x_i^2 / 4000) - prod(cos(x_i / sqrt(i))) + 1`, minimum 0 at the
    /// origin. Default box `[-100, 100]`.
    Griewank,
    /// `0.5 sum(x_i^4 - 16 x_i^2 + 5 x_i)`, minimum `-39.166 D` at
    /// `-2.903534`. Default box `[-5, 5]`.
    StyblinskiTang,
    /// `sum(x_i^6 (sin(1 / x_i) + 2))`, minimum 0 at the origin where the
    /// formula itself is singular. Default box `[-1, 1]`.
    Infinity,
}

impl BenchmarkFunction {
    /// Every registered function, in registry order.
    pub const ALL: [BenchmarkFunction; 8] = [
        BenchmarkFunction::Sphere,
        BenchmarkFunction::Rosenbrock,
        BenchmarkFunction::Rastrigin,
        BenchmarkFunction::Schwefel,
        BenchmarkFunction::Ackley,
        BenchmarkFunction::Griewank,
        BenchmarkFunction::StyblinskiTang,
        BenchmarkFunction::Infinity,
    ];

    /// Canonical registry name.
    pub fn name(self) -> &'static str {
        match self {
            BenchmarkFunction::Sphere => "sphere",
            BenchmarkFunction::Rosenbrock => "rosenbrock",
            BenchmarkFunction::Rastrigin => "rastrigin",
            BenchmarkFunction::Schwefel => "schwefel",
            BenchmarkFunction::Ackley => "ackley",
            BenchmarkFunction::Griewank => "griewank",
            BenchmarkFunction::StyblinskiTang => "styblinski_tang",
            BenchmarkFunction::Infinity => "infinity",
        }
    }

    /// Conventional `(lower, upper)` bounds for every component.
    pub fn default_bounds(self) -> (f64, f64) {
        match self {
            BenchmarkFunction::Sphere | BenchmarkFunction::Rastrigin => (-5.12, 5.12),
            BenchmarkFunction::Rosenbrock => (-30.0, 30.0),
            BenchmarkFunction::Schwefel => (-500.0, 500.0),
            BenchmarkFunction::Ackley => (-32.768, 32.768),
            BenchmarkFunction::Griewank => (-100.0, 100.0),
            BenchmarkFunction::StyblinskiTang => (-5.0, 5.0),
            BenchmarkFunction::Infinity => (-1.0, 1.0),
        }
    }

    /// Evaluates the function at `x`.
    pub fn evaluate(self, x: &[f64]) -> f64 {
        let d = x.len() as f64;
        match self {
            BenchmarkFunction::Sphere => x.iter().map(|v| v * v).sum(),
            BenchmarkFunction::Rosenbrock => x
                .windows(2)
                .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
                .sum(),
            BenchmarkFunction::Rastrigin => {
                10.0 * d + x.iter().map(|v| v * v - 10.0 * (2.0 * PI * v).cos()).sum::<f64>()
            }
            BenchmarkFunction::Schwefel => {
                418.9829 * d - x.iter().map(|v| v * v.abs().sqrt().sin()).sum::<f64>()
            }
            BenchmarkFunction::Ackley => {
                let (a, b, c) = (20.0, 0.2, 2.0 * PI);
                let sq = x.iter().map(|v| v * v).sum::<f64>() / d;
                let cs = x.iter().map(|v| (c * v).cos()).sum::<f64>() / d;
                -a * (-b * sq.sqrt()).exp() - cs.exp() + a + E
            }
            BenchmarkFunction::Griewank => {
                let sum = x.iter().map(|v| v * v / 4000.0).sum::<f64>();
                let prod = x
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (v / ((i + 1) as f64).sqrt()).cos())
                    .product::<f64>();
                sum - prod + 1.0
            }
            BenchmarkFunction::StyblinskiTang => {
                0.5 * x
                    .iter()
                    .map(|v| v.powi(4) - 16.0 * v * v + 5.0 * v)
                    .sum::<f64>()
            }
            BenchmarkFunction::Infinity => x
                .iter()
                .map(|v| v.powi(6) * ((1.0 / v).sin() + 2.0))
                .sum(),
        }
    }
}

impl fmt::Display for BenchmarkFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BenchmarkFunction {
    type Err = Error;

    /// Resolves a name case-insensitively, ignoring `_`, `-` and spaces.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        BenchmarkFunction::ALL
            .iter()
            .copied()
            .find(|func| func.name().replace('_', "") == key)
            .ok_or_else(|| Error::UnknownProblem(s.to_string()))
    }
}

/// A benchmark function bound to a dimension and a search box.
///
/// # Examples
///
/// ```
/// use u_evolve::problem::{Benchmark, BenchmarkFunction, Problem};
///
/// let sphere = Benchmark::new(BenchmarkFunction::Sphere, 5).unwrap();
/// assert_eq!(sphere.lower(), &[-5.12; 5]);
/// assert_eq!(sphere.evaluate(&[0.0; 5]), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    function: BenchmarkFunction,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Benchmark {
    /// Creates a benchmark with the function's default bounds.
    ///
    /// # Errors
    /// Fails for a zero dimension.
    pub fn new(function: BenchmarkFunction, dimension: usize) -> Result<Self> {
        let (lo, hi) = function.default_bounds();
        Self::with_bounds(function, dimension, lo, hi)
    }

    /// Creates a benchmark over a custom box.
    pub fn with_bounds(
        function: BenchmarkFunction,
        dimension: usize,
        lower: impl Into<Bound>,
        upper: impl Into<Bound>,
    ) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidConfig("dimension must be at least 1".into()));
        }
        let lower = lower.into().broadcast(dimension)?;
        let upper = upper.into().broadcast(dimension)?;
        validate_bounds(&lower, &upper)?;
        Ok(Self {
            function,
            lower,
            upper,
        })
    }

    /// Resolves `name` through the registry and uses default bounds.
    pub fn from_name(name: &str, dimension: usize) -> Result<Self> {
        Self::new(name.parse()?, dimension)
    }

    /// The underlying function.
    pub fn function(&self) -> BenchmarkFunction {
        self.function
    }
}

impl Problem for Benchmark {
    fn name(&self) -> &str {
        self.function.name()
    }

    fn dimension(&self) -> usize {
        self.lower.len()
    }

    fn lower(&self) -> &[f64] {
        &self.lower
    }

    fn upper(&self) -> &[f64] {
        &self.upper
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        self.function.evaluate(x)
    }
}
