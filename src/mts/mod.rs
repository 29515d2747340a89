//! Multiple Trajectory Search (MTS).
//!
//! A local-search engine that keeps one trajectory per individual. Each
//! generation, enabled trajectories grade a set of [`LocalSearch`]
//! operators, keep refining with the best-scoring one, and adapt their
//! per-dimension step sizes: a trajectory that stops improving halves its
//! search range, and components that underflow are reset to a fraction of
//! the bound range so the search never freezes.
//!
//! # Key Types
//!
//! - [`MtsConfig`] / [`TrajectoryConfig`]: parameters and presets
//! - [`LocalSearch`]: LS1, LS1v1, LS2, LS3, LS3v1
//! - [`MultipleTrajectorySearch`]: the stand-alone algorithm
//! - [`refine`] / [`reenable_worst`]: building blocks reused by the
//!   differential evolution hybrids
//!
//! # References
//!
//! - Tseng & Chen (2008), "Multiple trajectory search for Large Scale Global
//!   Optimization", IEEE CEC 2008

mod config;
mod local_search;
mod runner;

pub use config::{MtsConfig, TrajectoryConfig};
pub use local_search::{LocalSearch, SearchPoint, SEARCH_RANGE_UNDERFLOW};
pub use runner::{reenable_worst, refine, MultipleTrajectorySearch, SearchState};
