//! Small value types shared by the task machinery.

use crate::error::Error;

/// Optimization direction.
///
/// The discriminant is the sign applied to raw objective values so that
/// every internal comparison can assume "lower is better".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptimizationType {
    /// Minimize the objective (the default).
    #[default]
    Minimization,
    /// Maximize the objective.
    Maximization,
}

impl OptimizationType {
    /// `+1.0` for minimization, `-1.0` for maximization.
    pub fn sign(self) -> f64 {
        match self {
            OptimizationType::Minimization => 1.0,
            OptimizationType::Maximization => -1.0,
        }
    }
}

/// How a task reacts once a budget is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopMode {
    /// Further evaluations return the worst possible fitness and leave the
    /// counters untouched. Algorithms notice the stop by polling.
    #[default]
    Stopping,
    /// Further evaluations fail with the error of the exhausted resource.
    Throwing,
}

/// Which resource ended a run.
///
/// Variants are listed in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `evaluations >= max_evals`.
    Evaluations,
    /// `iterations >= max_iters`.
    Iterations,
    /// The best-so-far fitness reached the reference value.
    ReferenceValue,
    /// The wall-clock limit elapsed.
    TimeLimit,
}

impl From<StopReason> for Error {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::Evaluations => Error::EvaluationBudgetExhausted,
            StopReason::Iterations => Error::IterationBudgetExhausted,
            StopReason::ReferenceValue => Error::ReferenceValueReached,
            StopReason::TimeLimit => Error::TimeLimitReached,
        }
    }
}
