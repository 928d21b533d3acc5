//! Seeded pseudo-random stream

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random stream used by generators and update rules.
///
/// Two streams built from the same seed yield identical sequences for
/// any interleaving of `random`, `int` and `chance` calls.
#[derive(Clone, Debug)]
pub struct SimRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1)
    pub fn random(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in [0, bound) by floor-scaling a uniform float.
    ///
    /// `bound` must be positive.
    pub fn int(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "SimRng::int called with zero bound");
        let scaled = (self.random() * bound as f64).floor() as usize;
        // Guards the float edge case where random() * bound rounds up to bound
        scaled.min(bound.saturating_sub(1))
    }

    /// Bernoulli trial with success probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.random() < p
    }

    /// Independent stream seeded from this stream's seed plus `offset`.
    ///
    /// Does not consume draws from `self`.
    pub fn derive(&self, offset: u64) -> SimRng {
        SimRng::new(self.seed.wrapping_add(offset))
    }

    /// Uniformly pick an element of a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.int(items.len())]
    }
}
