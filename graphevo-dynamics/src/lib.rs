//! GRAPHEVO Dynamics - Evolutionary update rules
//!
//! This crate provides the stochastic population dynamics:
//! - Fitness mapping and weighted selection
//! - Mutation on inheritance
//! - Death-Birth, Birth-Death and Fermi imitation updates
//! - A caller-owned simulation session that drives the step loop

pub mod config;
pub mod mutation;
pub mod rules;
pub mod selection;
pub mod session;

pub use config::{DynamicsConfig, SelectionParams};
pub use mutation::inherit;
pub use rules::{StepOutcome, UpdateRule};
pub use selection::{fermi, fitness, weighted_index};
pub use session::{SessionSnapshot, SimulationSession};
