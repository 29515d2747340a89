//! The [`Problem`] contract and a closure-backed implementation.

use crate::error::{Error, Result};

/// An objective function over a bounded box.
///
/// Implementations are immutable: evaluating a point must not change any
/// state, which lets one problem back many independent tasks.
///
/// # Implementing
///
/// ```
/// use u_evolve::problem::Problem;
///
/// struct Shifted {
///     lower: Vec<f64>,
///     upper: Vec<f64>,
/// }
///
/// impl Problem for Shifted {
///     fn name(&self) -> &str { "shifted" }
///     fn dimension(&self) -> usize { self.lower.len() }
///     fn lower(&self) -> &[f64] { &self.lower }
///     fn upper(&self) -> &[f64] { &self.upper }
///     fn evaluate(&self, x: &[f64]) -> f64 {
///         x.iter().map(|v| (v - 1.0).powi(2)).sum()
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Human-readable name, used in logs and experiment reports.
    fn name(&self) -> &str;

    /// Number of decision variables.
    fn dimension(&self) -> usize;

    /// Per-component lower bounds (length [`dimension`](Problem::dimension)).
    fn lower(&self) -> &[f64];

    /// Per-component upper bounds (length [`dimension`](Problem::dimension)).
    fn upper(&self) -> &[f64];

    /// Raw objective value of `x`.
    ///
    /// May return `inf` for points where the function is singular.
    fn evaluate(&self, x: &[f64]) -> f64;
}

/// A bound value that is broadcast to the problem dimension.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bound {
    /// The same value for every component.
    Scalar(f64),
    /// Per-component values. Longer vectors are truncated, shorter ones tiled.
    Vector(Vec<f64>),
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Scalar(v)
    }
}

impl From<Vec<f64>> for Bound {
    fn from(v: Vec<f64>) -> Self {
        Bound::Vector(v)
    }
}

impl From<&[f64]> for Bound {
    fn from(v: &[f64]) -> Self {
        Bound::Vector(v.to_vec())
    }
}

impl Bound {
    /// Expands the bound to exactly `dimension` values.
    ///
    /// # Errors
    /// Returns [`Error::BoundsLength`] for an empty vector.
    pub fn broadcast(&self, dimension: usize) -> Result<Vec<f64>> {
        match self {
            Bound::Scalar(v) => Ok(vec![*v; dimension]),
            Bound::Vector(values) if values.is_empty() => Err(Error::BoundsLength {
                expected: dimension,
                got: 0,
            }),
            Bound::Vector(values) => Ok(values.iter().copied().cycle().take(dimension).collect()),
        }
    }
}

/// Checks that bounds are finite, equally long and strictly ordered.
pub fn validate_bounds(lower: &[f64], upper: &[f64]) -> Result<()> {
    if lower.len() != upper.len() {
        return Err(Error::BoundsLength {
            expected: lower.len(),
            got: upper.len(),
        });
    }
    for (index, (&lo, &hi)) in lower.iter().zip(upper).enumerate() {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(Error::InvalidBounds {
                index,
                lower: lo,
                upper: hi,
            });
        }
    }
    Ok(())
}

/// A problem defined by a closure.
///
/// # Examples
///
/// ```
/// use u_evolve::problem::{FnProblem, Problem};
///
/// let p = FnProblem::new("sum", 3, -1.0, 1.0, |x: &[f64]| x.iter().sum()).unwrap();
/// assert_eq!(p.lower(), &[-1.0, -1.0, -1.0]);
/// assert_eq!(p.evaluate(&[0.5, 0.5, 0.0]), 1.0);
/// ```
pub struct FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    name: String,
    lower: Vec<f64>,
    upper: Vec<f64>,
    objective: F,
}

impl<F> FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Creates a problem, broadcasting `lower` and `upper` to `dimension`.
    ///
    /// # Errors
    /// Fails for a zero dimension or invalid bounds.
    pub fn new(
        name: impl Into<String>,
        dimension: usize,
        lower: impl Into<Bound>,
        upper: impl Into<Bound>,
        objective: F,
    ) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidConfig("dimension must be at least 1".into()));
        }
        let lower = lower.into().broadcast(dimension)?;
        let upper = upper.into().broadcast(dimension)?;
        validate_bounds(&lower, &upper)?;
        Ok(Self {
            name: name.into(),
            lower,
            upper,
            objective,
        })
    }
}

impl<F> Problem for FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
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
        (self.objective)(x)
    }
}

impl<F> std::fmt::Debug for FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProblem")
            .field("name", &self.name)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_scalar() {
        assert_eq!(Bound::Scalar(2.0).broadcast(3).unwrap(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_broadcast_truncates_and_tiles() {
        let b = Bound::Vector(vec![1.0, 2.0, 3.0]);
        assert_eq!(b.broadcast(2).unwrap(), vec![1.0, 2.0]);
        assert_eq!(
            b.broadcast(7).unwrap(),
            vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]
        );
    }

    #[test]
    fn test_broadcast_empty_vector() {
        assert!(matches!(
            Bound::Vector(vec![]).broadcast(3),
            Err(Error::BoundsLength { expected: 3, got: 0 })
        ));
    }

    #[test]
    fn test_mixed_bounds_broadcast() {
        // lower [2, 1, 1] and upper [10, 10, 2] tiled to 6 components
        let p = FnProblem::new(
            "tiled",
            6,
            vec![2.0, 1.0, 1.0],
            vec![10.0, 10.0, 2.0],
            |x: &[f64]| x.iter().sum(),
        )
        .unwrap();
        assert_eq!(p.lower(), &[2.0, 1.0, 1.0, 2.0, 1.0, 1.0]);
        assert_eq!(p.upper(), &[10.0, 10.0, 2.0, 10.0, 10.0, 2.0]);
        assert_eq!(p.dimension(), 6);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = FnProblem::new("bad", 2, vec![0.0, 5.0], 3.0, |_: &[f64]| 0.0).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBounds {
                index: 1,
                lower: 5.0,
                upper: 3.0
            }
        );
    }

    #[test]
    fn test_rejects_equal_and_infinite_bounds() {
        assert!(FnProblem::new("eq", 2, 1.0, 1.0, |_: &[f64]| 0.0).is_err());
        assert!(FnProblem::new("inf", 2, f64::NEG_INFINITY, 1.0, |_: &[f64]| 0.0).is_err());
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let err = FnProblem::new("empty", 0, -1.0, 1.0, |_: &[f64]| 0.0).unwrap_err();
        assert!(err.is_config_error());
    }
}
