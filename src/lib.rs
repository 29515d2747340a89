//! Nature-inspired continuous optimization.
//!
//! Provides a bounded evaluation contract and population-based algorithms
//! built on it:
//!
//! - **Task**: wraps a [`Problem`](problem::Problem) with evaluation and
//!   iteration budgets, best-so-far tracking, bound repair and two
//!   exhaustion policies (sentinel values or errors).
//! - **Differential Evolution (DE)**: DE, jDE, multi-strategy, halving and
//!   aging population variants, assembled from interchangeable mutation
//!   strategies, parameter adaptation and population schedules.
//! - **Multiple Trajectory Search (MTS)**: graded local-search operators
//!   (LS1, LS2, LS3 and their v1 forms), usable on their own or as the
//!   refinement step of DE-MTS hybrids.
//! - **Experiments**: repeated runs of named algorithms on named
//!   benchmarks, with per-pair summaries.
//!
//! # Architecture
//!
//! Every algorithm implements [`Algorithm`](algorithm::Algorithm): it
//! creates a population, advances it one generation at a time, and polls
//! the task between generations. The task is the only owner of the
//! evaluation counter, and the random number generator is passed
//! explicitly, so a fixed seed reproduces a run exactly.
//!
//! # Example
//!
//! ```
//! use u_evolve::algorithm::Algorithm;
//! use u_evolve::de::{DeConfig, DifferentialEvolution};
//! use u_evolve::task::{Task, TaskConfig};
//!
//! let mut task = Task::from_name("rastrigin", 5, TaskConfig::default().with_max_evals(5_000)).unwrap();
//! let jde = DifferentialEvolution::new(DeConfig::jde().with_population_size(20).with_seed(1)).unwrap();
//!
//! let solution = jde.run(&mut task).unwrap();
//! assert_eq!(solution.evaluations, 5_000);
//! assert_eq!(solution.value, task.best_value().unwrap());
//! ```

pub mod algorithm;
pub mod de;
pub mod error;
pub mod experiment;
pub mod individual;
pub mod mts;
pub mod problem;
pub mod task;
