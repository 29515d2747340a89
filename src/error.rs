//! Error types.
//!
//! Configuration problems are reported when a task or algorithm is built.
//! Budget exhaustion is only an error for tasks running in
//! [`StopMode::Throwing`](crate::task::StopMode::Throwing); the default
//! stopping mode answers exhausted evaluations with a worst-case fitness.

use thiserror::Error;

/// Errors produced by tasks, problems and algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A lower bound is not strictly below its upper bound, or is not finite.
    #[error("invalid bounds at index {index}: lower ({lower}) must be < upper ({upper})")]
    InvalidBounds {
        /// Component index of the offending pair.
        index: usize,
        /// Lower bound value.
        lower: f64,
        /// Upper bound value.
        upper: f64,
    },

    /// A bound vector could not be broadcast to the problem dimension.
    #[error("bound vector has {got} elements, expected {expected}")]
    BoundsLength {
        /// Problem dimension.
        expected: usize,
        /// Provided length.
        got: usize,
    },

    /// A solution vector does not match the problem dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Problem dimension.
        expected: usize,
        /// Length of the offending vector.
        got: usize,
    },

    /// An algorithm, task or experiment parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No benchmark is registered under this name.
    #[error("unknown problem: {0}")]
    UnknownProblem(String),

    /// No algorithm is registered under this name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The evaluation budget is used up.
    #[error("reached the allowed number of function evaluations")]
    EvaluationBudgetExhausted,

    /// The iteration (generation) budget is used up.
    #[error("reached the allowed number of algorithm iterations")]
    IterationBudgetExhausted,

    /// The best-so-far fitness reached the configured reference value.
    #[error("reached the reference value")]
    ReferenceValueReached,

    /// The wall-clock limit elapsed.
    #[error("reached the allowed run time")]
    TimeLimitReached,
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` for the errors a throwing task raises when a
    /// resource runs out.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(
            self,
            Error::EvaluationBudgetExhausted
                | Error::IterationBudgetExhausted
                | Error::ReferenceValueReached
                | Error::TimeLimitReached
        )
    }

    /// Returns `true` for errors raised while building tasks, problems or
    /// algorithms.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidBounds { .. }
                | Error::BoundsLength { .. }
                | Error::InvalidConfig(_)
                | Error::UnknownProblem(_)
                | Error::UnknownAlgorithm(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidBounds {
            index: 2,
            lower: 5.0,
            upper: 3.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid bounds at index 2: lower (5) must be < upper (3)"
        );
        assert_eq!(
            Error::UnknownProblem("foo".into()).to_string(),
            "unknown problem: foo"
        );
    }

    #[test]
    fn test_budget_predicates() {
        assert!(Error::EvaluationBudgetExhausted.is_budget_exhausted());
        assert!(Error::IterationBudgetExhausted.is_budget_exhausted());
        assert!(Error::ReferenceValueReached.is_budget_exhausted());
        assert!(Error::TimeLimitReached.is_budget_exhausted());
        assert!(!Error::InvalidConfig("x".into()).is_budget_exhausted());
    }

    #[test]
    fn test_config_predicates() {
        assert!(Error::InvalidConfig("x".into()).is_config_error());
        assert!(Error::UnknownAlgorithm("x".into()).is_config_error());
        assert!(Error::BoundsLength {
            expected: 3,
            got: 0
        }
        .is_config_error());
        assert!(!Error::EvaluationBudgetExhausted.is_config_error());
        assert!(!Error::DimensionMismatch {
            expected: 2,
            got: 3
        }
        .is_config_error());
    }
}
