//! GRAPHEVO Fixation - Monte Carlo fixation probabilities
//!
//! This crate provides the repeated-trial estimator:
//! - Single-mutant trials run until absorption or a step budget
//! - Batches alternating cooperator and defector invasions
//! - Parallel execution, cancellation and progress reporting
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: FixationEstimator::run (orchestration)
//! - Level 2: execute_trials, aggregate_results (phases)
//! - Level 3: run_trial (steps)
//! - Level 4: configuration, cancellation, outcome counters

mod cancel;
mod config;
mod estimator;
mod trial;

pub use cancel::CancelToken;
pub use config::FixationConfig;
pub use estimator::{estimate_fixation, FixationEstimator, FixationResult, OutcomeCounts};
pub use trial::{run_trial, Scenario, TrialOutcome, TrialResult};
