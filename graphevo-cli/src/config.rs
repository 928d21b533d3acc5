//! JSON run configuration
//!
//! Level 4 - Configuration

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use graphevo_core::GraphConfig;
use graphevo_dynamics::DynamicsConfig;
use graphevo_fixation::FixationConfig;

use crate::GlobalOpts;

/// Everything needed to reproduce a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub graph: GraphConfig,
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixation: Option<FixationConfig>,
}

impl SimConfig {
    pub fn new(graph: GraphConfig, dynamics: DynamicsConfig) -> Self {
        Self {
            graph,
            dynamics,
            fixation: None,
        }
    }

    pub fn with_fixation(mut self, fixation: FixationConfig) -> Self {
        self.fixation = Some(fixation);
        self
    }

    /// Reseed the graph and derive every other stream from it
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.graph.seed = seed;
        let session_seed = self.session_seed();
        if let Some(fixation) = self.fixation.as_mut() {
            fixation.base_seed = session_seed;
        }
        self
    }

    /// Seed for the dynamics stream, kept apart from the graph stream
    pub fn session_seed(&self) -> u64 {
        self.graph.seed.wrapping_add(1)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .dynamics
            .validate()
            .with_context(|| format!("Invalid dynamics in {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Pick the run configuration: the `--config` file when given, otherwise
/// `from_flags`. An explicit `--seed` reseeds either one. The result is
/// written to `--save-config` if requested.
pub fn resolve<F>(global: &GlobalOpts, from_flags: F) -> Result<SimConfig>
where
    F: FnOnce(u64) -> SimConfig,
{
    let config = match &global.config {
        Some(path) => {
            let config = SimConfig::load(path)?;
            tracing::info!("Loaded config from {}", path.display());
            match global.seed {
                Some(seed) => config.with_seed(seed),
                None => config,
            }
        }
        None => {
            let seed = global.seed.unwrap_or_else(entropy_seed);
            from_flags(seed).with_seed(seed)
        }
    };

    if let Some(path) = &global.save_config {
        config.save(path)?;
        tracing::info!("Saved config to {}", path.display());
    }

    Ok(config)
}

fn entropy_seed() -> u64 {
    let seed = rand::random::<u64>();
    tracing::info!("No --seed given, using {}", seed);
    seed
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use graphevo_core::{GameSpec, Topology};
    use graphevo_dynamics::UpdateRule;
    use tempfile::tempdir;

    fn sample() -> SimConfig {
        SimConfig::new(
            GraphConfig::new(Topology::BarabasiAlbert { m0: 4, m: 2 }, 40).with_seed(5),
            DynamicsConfig::new(GameSpec::Donation { b: 5.0, c: 1.0 }, UpdateRule::Imitation)
                .with_intensity(1.0),
        )
        .with_fixation(FixationConfig::new(20, 1000).sequential())
    }

    fn opts(seed: Option<u64>) -> GlobalOpts {
        GlobalOpts {
            seed,
            config: None,
            save_config: None,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");

        let config = sample();
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("minimal.json");
        fs::write(
            &path,
            r#"{"graph": {"topology": {"kind": "lattice"}, "nodes": 49, "seed": 3}}"#,
        )
        .unwrap();

        let loaded = SimConfig::load(&path).unwrap();
        assert_eq!(loaded.graph.topology, Topology::Lattice);
        assert_eq!(loaded.dynamics, DynamicsConfig::default());
        assert!(loaded.fixation.is_none());
    }

    #[test]
    fn test_load_rejects_invalid_dynamics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut config = sample();
        config.dynamics.mutation_rate = 2.0;
        config.save(&path).unwrap();

        assert!(SimConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(SimConfig::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_with_seed_derives_streams() {
        let config = sample().with_seed(100);
        assert_eq!(config.graph.seed, 100);
        assert_eq!(config.session_seed(), 101);
        assert_eq!(config.fixation.unwrap().base_seed, 101);
    }

    #[test]
    fn test_resolve_from_flags() {
        let config = resolve(&opts(Some(7)), |seed| {
            SimConfig::new(GraphConfig::default().with_seed(seed), DynamicsConfig::default())
                .with_fixation(FixationConfig::default())
        })
        .unwrap();
        assert_eq!(config.graph.seed, 7);
        assert_eq!(config.fixation.unwrap().base_seed, 8);
    }

    #[test]
    fn test_resolve_prefers_file_and_saves() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        sample().save(&input).unwrap();

        let global = GlobalOpts {
            seed: None,
            config: Some(input),
            save_config: Some(output.clone()),
        };
        let config = resolve(&global, |_| unreachable!()).unwrap();
        assert_eq!(config, sample());
        assert_eq!(SimConfig::load(&output).unwrap(), sample());
    }
}
