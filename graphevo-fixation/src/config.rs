//! Configuration for fixation batches
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};

/// Fixation batch configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixationConfig {
    /// Number of trials (even indices: cooperator invades, odd: defector invades)
    pub trials: usize,
    /// Update budget per trial before it counts as a timeout
    pub max_steps: u64,
    /// Seed of the root stream; trial `i` runs on `root.derive(i)`
    pub base_seed: u64,
    /// Whether to run trials on the rayon pool
    pub parallel: bool,
}

impl Default for FixationConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            max_steps: 100_000,
            base_seed: 42,
            parallel: true,
        }
    }
}

impl FixationConfig {
    /// Create config with the given trial count and step budget
    pub fn new(trials: usize, max_steps: u64) -> Self {
        Self {
            trials,
            max_steps,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, base_seed: u64) -> Self {
        self.base_seed = base_seed;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FixationConfig::default();
        assert_eq!(config.trials, 1000);
        assert_eq!(config.max_steps, 100_000);
        assert!(config.parallel);
    }

    #[test]
    fn test_builders() {
        let config = FixationConfig::new(10, 500).with_seed(7).sequential();
        assert_eq!(config.trials, 10);
        assert_eq!(config.max_steps, 500);
        assert!(!config.parallel);
        assert_eq!(config.base_seed, 7);
    }
}
