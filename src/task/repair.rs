//! Boundary repair strategies.
//!
//! A repair maps every out-of-bounds component of a candidate back into
//! `[lower, upper]`. In-bounds components are never touched, which makes
//! every strategy idempotent.
//!
//! # References
//!
//! - Wang et al. (2011), "Differential evolution with composite trial
//!   vector generation strategies and control parameters" (bounded
//!   reflection)
//! - Kononova et al. (2022), "Differential Evolution Outside the Box"

use rand::Rng;

/// Strategy for pulling infeasible components back into the box.
///
/// # Examples
///
/// ```
/// use u_evolve::task::RepairStrategy;
///
/// let mut rng = rand::rng();
/// let lower = [0.0, 0.0];
/// let upper = [10.0, 10.0];
///
/// let mut x = [-2.0, 12.0];
/// RepairStrategy::Limit.apply(&mut x, &lower, &upper, &mut rng);
/// assert_eq!(x, [0.0, 10.0]);
///
/// let mut x = [-2.0, 12.0];
/// RepairStrategy::Wang.apply(&mut x, &lower, &upper, &mut rng);
/// assert_eq!(x, [2.0, 8.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepairStrategy {
    /// Clamp to the violated bound.
    #[default]
    Limit,

    /// Jump to the opposite bound: below `lower` becomes `upper` and
    /// above `upper` becomes `lower`.
    LimitInverse,

    /// Bounded reflection around the violated edge:
    /// `min(upper, 2 lower - x)` below, `max(lower, 2 upper - x)` above.
    Wang,

    /// Redraw uniformly in `[lower, upper]`.
    Random,

    /// Toroidal wrap: `lower + (x mod (upper - lower))`.
    Reflect,
}

impl RepairStrategy {
    /// Repairs `x` in place.
    ///
    /// After the call every component lies in `[lower_i, upper_i]`, provided
    /// the input components are finite and `lower_i < upper_i`.
    pub fn apply<R: Rng + ?Sized>(&self, x: &mut [f64], lower: &[f64], upper: &[f64], rng: &mut R) {
        debug_assert_eq!(x.len(), lower.len());
        debug_assert_eq!(x.len(), upper.len());

        for ((v, &lo), &hi) in x.iter_mut().zip(lower).zip(upper) {
            if *v >= lo && *v <= hi {
                continue;
            }
            *v = match self {
                RepairStrategy::Limit => v.clamp(lo, hi),
                RepairStrategy::LimitInverse => {
                    if *v < lo {
                        hi
                    } else {
                        lo
                    }
                }
                RepairStrategy::Wang => {
                    if *v < lo {
                        hi.min(2.0 * lo - *v)
                    } else {
                        lo.max(2.0 * hi - *v)
                    }
                }
                RepairStrategy::Random => rng.random_range(lo..=hi),
                // rem_euclid may round up to exactly the width
                RepairStrategy::Reflect => (lo + v.rem_euclid(hi - lo)).min(hi),
            };
        }
    }

    /// Whether every component of `x` lies inside the box.
    pub fn is_feasible(x: &[f64], lower: &[f64], upper: &[f64]) -> bool {
        x.iter()
            .zip(lower)
            .zip(upper)
            .all(|((v, lo), hi)| v >= lo && v <= hi)
    }
}
