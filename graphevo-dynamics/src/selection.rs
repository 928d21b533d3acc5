//! Selection operators for update rules
//!
//! Payoffs become sampling weights through a linear fitness map; parents
//! are then drawn proportionally to those weights.

use graphevo_core::SimRng;

/// Fitness of a node with accumulated `payoff` under selection `intensity`.
///
/// `max(0, 1 - w + w * payoff)`, clamped because it is used as a weight.
#[inline]
pub fn fitness(payoff: f64, intensity: f64) -> f64 {
    (1.0 - intensity + intensity * payoff).max(0.0)
}

/// Fermi adoption probability for a payoff advantage `delta` of the model
/// over the focal player.
#[inline]
pub fn fermi(delta: f64, beta: f64) -> f64 {
    1.0 / (1.0 + (-beta * delta).exp())
}

/// Draw an index into `weights` with probability proportional to its weight.
///
/// Falls back to a uniform draw when the total weight is not positive.
///
/// # Panics
/// Panics if `weights` is empty
pub fn weighted_index(weights: &[f64], rng: &mut SimRng) -> usize {
    assert!(!weights.is_empty(), "Cannot select from an empty candidate set");

    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return rng.int(weights.len());
    }

    let target = rng.random() * total;
    let mut cumulative = 0.0;
    for (idx, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        if target < cumulative {
            return idx;
        }
    }

    // Rounding left target at the very top; take the last positive weight
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}
