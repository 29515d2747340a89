//! Optimization tasks.
//!
//! A [`Task`] wraps a [`Problem`](crate::problem::Problem) with everything a
//! single run needs: evaluation and iteration budgets, a reference value,
//! the optimization direction, a repair strategy for out-of-bounds
//! candidates and the best-so-far bookkeeping.
//!
//! Algorithms never call a problem directly. Every evaluation goes through
//! [`Task::eval`], which is where budgets are enforced.

mod config;
mod repair;
mod runtime;
mod types;

pub use config::TaskConfig;
pub use repair::RepairStrategy;
pub use runtime::Task;
pub use types::{OptimizationType, StopMode, StopReason};
