//! Mutation on inheritance

use graphevo_core::{SimRng, Strategy};

/// Strategy passed on from `parent`, flipped with probability `mutation_rate`.
///
/// Always consumes exactly one draw, so streams stay aligned across rates.
pub fn inherit(parent: Strategy, mutation_rate: f64, rng: &mut SimRng) -> Strategy {
    if rng.chance(mutation_rate) {
        parent.flipped()
    } else {
        parent
    }
}
