//! Differential Evolution (DE) family.
//!
//! Population-based search over real vectors: each target builds a trial
//! from scaled difference vectors of other members, mixes it with itself
//! by binomial crossover and replaces itself when the trial is no worse.
//!
//! Variants are assembled from small parts instead of separate types:
//!
//! - [`Strategy`]: the mutation rule (several may compete per target)
//! - [`SelfAdaptation`]: jDE control-parameter adaptation
//! - [`PopulationSchedule`]: fixed, halving or aging ([`Aging`]) population
//! - an optional [`TrajectoryConfig`](crate::mts::TrajectoryConfig) that
//!   refines the population with MTS after selection
//!
//! # Key Types
//!
//! - [`DeConfig`]: parameters and named presets (`de`, `jde`, `ms_de`,
//!   `dyn_np_de`, `aging_np_de`, `de_mts`, ...)
//! - [`DifferentialEvolution`]: the algorithm

mod adaptation;
mod config;
mod runner;
mod strategy;

pub use adaptation::{Aging, ControlParams, PopulationSchedule, SelfAdaptation};
pub use config::DeConfig;
pub use runner::{DeState, DifferentialEvolution};
pub use strategy::{binomial_crossover, donor_indices, Strategy};
