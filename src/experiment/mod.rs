//! Batches of independent runs.
//!
//! An experiment crosses a list of algorithm names with a list of problem
//! names and repeats every pair a fixed number of times. Names resolve
//! through [`algorithm_by_name`] and the benchmark catalog; results come
//! back as an [`ExperimentReport`] with per-pair [`Summary`] statistics.
//! Exporting reports is left to the caller (enable the `serde` feature to
//! serialize them).

mod config;
mod registry;
mod runner;
mod types;

pub use config::ExperimentConfig;
pub use registry::{algorithm_by_name, ALGORITHM_NAMES};
pub use runner::ExperimentRunner;
pub use types::{ExperimentReport, RunRecord, Summary};
