//! Objective functions and their search boxes.
//!
//! The optimization core treats a problem as an opaque callable with bounds.
//! Users plug in their own objective by implementing [`Problem`] or by
//! wrapping a closure in [`FnProblem`]; a small catalog of classic
//! benchmarks is available through [`Benchmark`] and resolvable by name.

mod functions;
mod types;

pub use functions::{Benchmark, BenchmarkFunction};
pub use types::{validate_bounds, Bound, FnProblem, Problem};
