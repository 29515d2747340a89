//! Task configuration.

use super::repair::RepairStrategy;
use super::types::{OptimizationType, StopMode};
use crate::error::{Error, Result};

/// Budgets and policies for one optimization run.
///
/// Every budget is optional; a task without any budget never stops on its
/// own, so at least one of them should normally be set.
///
/// # Examples
///
/// ```
/// use u_evolve::task::{OptimizationType, RepairStrategy, StopMode, TaskConfig};
///
/// let config = TaskConfig::default()
///     .with_max_evals(10_000)
///     .with_max_iters(500)
///     .with_reference_value(1e-8)
///     .with_optimization_type(OptimizationType::Minimization)
///     .with_repair(RepairStrategy::Wang)
///     .with_stop_mode(StopMode::Stopping);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskConfig {
    /// Minimize or maximize.
    pub optimization_type: OptimizationType,

    /// Repair applied by [`Task::repair`](super::Task::repair).
    pub repair: RepairStrategy,

    /// Maximum number of objective evaluations. `None` = unlimited.
    pub max_evals: Option<usize>,

    /// Maximum number of iterations (generations). `None` = unlimited.
    pub max_iters: Option<usize>,

    /// Stop once the best raw objective value reaches this target
    /// (`<=` when minimizing, `>=` when maximizing).
    pub reference_value: Option<f64>,

    /// Optional wall-clock limit in milliseconds, checked like the other
    /// budgets.
    pub time_limit_ms: Option<u64>,

    /// Whether exhaustion is reported by sentinel values or by errors.
    pub stop_mode: StopMode,

    /// Log every best-so-far improvement at `info` level.
    pub enable_logging: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            optimization_type: OptimizationType::Minimization,
            repair: RepairStrategy::Limit,
            max_evals: None,
            max_iters: None,
            reference_value: None,
            time_limit_ms: None,
            stop_mode: StopMode::Stopping,
            enable_logging: false,
        }
    }
}

impl TaskConfig {
    /// Sets the optimization direction.
    pub fn with_optimization_type(mut self, t: OptimizationType) -> Self {
        self.optimization_type = t;
        self
    }

    /// Sets the repair strategy.
    pub fn with_repair(mut self, repair: RepairStrategy) -> Self {
        self.repair = repair;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evals(mut self, n: usize) -> Self {
        self.max_evals = Some(n);
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iters(mut self, n: usize) -> Self {
        self.max_iters = Some(n);
        self
    }

    /// Sets the reference (cutoff) value.
    pub fn with_reference_value(mut self, v: f64) -> Self {
        self.reference_value = Some(v);
        self
    }

    /// Sets the wall-clock limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Selects stopping or throwing behaviour.
    pub fn with_stop_mode(mut self, mode: StopMode) -> Self {
        self.stop_mode = mode;
        self
    }

    /// Shorthand for `with_stop_mode(StopMode::Throwing)`.
    pub fn throwing(self) -> Self {
        self.with_stop_mode(StopMode::Throwing)
    }

    /// Enables or disables improvement logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Whether an evaluation, iteration or time limit is set. A reference
    /// value alone may never be reached, so it does not count.
    pub fn has_budget(&self) -> bool {
        self.max_evals.is_some() || self.max_iters.is_some() || self.time_limit_ms.is_some()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(v) = self.reference_value {
            if v.is_nan() {
                return Err(Error::InvalidConfig("reference_value must not be NaN".into()));
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err(Error::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TaskConfig::default();
        assert_eq!(config.optimization_type, OptimizationType::Minimization);
        assert_eq!(config.repair, RepairStrategy::Limit);
        assert!(config.max_evals.is_none());
        assert!(config.max_iters.is_none());
        assert!(config.reference_value.is_none());
        assert!(config.time_limit_ms.is_none());
        assert_eq!(config.stop_mode, StopMode::Stopping);
        assert!(!config.enable_logging);
        assert!(!config.has_budget());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_has_budget() {
        assert!(TaskConfig::default().with_max_evals(10).has_budget());
        assert!(TaskConfig::default().with_max_iters(10).has_budget());
        assert!(TaskConfig::default().with_time_limit_ms(10).has_budget());
        assert!(!TaskConfig::default().with_reference_value(0.0).has_budget());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TaskConfig::default()
            .with_max_evals(100)
            .with_max_iters(10)
            .with_reference_value(0.5)
            .with_optimization_type(OptimizationType::Maximization)
            .with_repair(RepairStrategy::Reflect)
            .with_time_limit_ms(250)
            .with_logging(true)
            .throwing();

        assert_eq!(config.max_evals, Some(100));
        assert_eq!(config.max_iters, Some(10));
        assert_eq!(config.reference_value, Some(0.5));
        assert_eq!(config.optimization_type, OptimizationType::Maximization);
        assert_eq!(config.repair, RepairStrategy::Reflect);
        assert_eq!(config.time_limit_ms, Some(250));
        assert!(config.enable_logging);
        assert_eq!(config.stop_mode, StopMode::Throwing);
    }

    #[test]
    fn test_validate_nan_reference() {
        let config = TaskConfig::default().with_reference_value(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        assert!(TaskConfig::default().with_time_limit_ms(0).validate().is_err());
        assert!(TaskConfig::default().with_time_limit_ms(1).validate().is_ok());
    }
}
