//! Strategies and population-level helpers

use serde::{Deserialize, Serialize};

/// One of the two strategies in the game.
///
/// Encoded as 1 (cooperate) and 0 (defect) wherever a numeric form is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Defect = 0,
    Cooperate = 1,
}

impl Strategy {
    /// The other strategy
    pub fn flipped(self) -> Self {
        match self {
            Strategy::Cooperate => Strategy::Defect,
            Strategy::Defect => Strategy::Cooperate,
        }
    }

    pub fn is_cooperator(self) -> bool {
        self == Strategy::Cooperate
    }

    pub fn as_bit(self) -> u8 {
        self as u8
    }
}

/// True when every node plays the same strategy.
///
/// An empty population counts as fixated.
pub fn is_fixated(strategies: &[Strategy]) -> bool {
    match strategies.first() {
        Some(&first) => strategies.iter().all(|&s| s == first),
        None => true,
    }
}

pub fn cooperator_count(strategies: &[Strategy]) -> usize {
    strategies.iter().filter(|s| s.is_cooperator()).count()
}

/// Pack strategies into the 0/1 form read by external consumers
pub fn to_bits(strategies: &[Strategy]) -> Vec<u8> {
    strategies.iter().map(|s| s.as_bit()).collect()
}
