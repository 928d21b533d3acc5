//! GRAPHEVO Core - Populations on graphs
//!
//! This crate provides the building blocks shared by every simulation:
//! - Seeded pseudo-random streams
//! - Undirected graphs and topology generators
//! - Strategies (cooperate/defect) and population helpers
//! - 2x2 game matrices and per-node payoff accumulation

pub mod error;
pub mod rng;
pub mod graph;
pub mod topology;
pub mod strategy;
pub mod payoff;

// Re-exports for convenient access
pub use error::ParamError;
pub use rng::SimRng;
pub use graph::{DegreeStats, Graph};
pub use topology::{GraphConfig, Topology};
pub use strategy::{cooperator_count, is_fixated, to_bits, Strategy};
pub use payoff::{compute_payoffs, donation_to_matrix, GameMatrix, GameSpec};
