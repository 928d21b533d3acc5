//! Configuration types for population dynamics

use graphevo_core::{GameMatrix, GameSpec, ParamError};
use serde::{Deserialize, Serialize};

use crate::rules::UpdateRule;

/// Parameters of a dynamics run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Game played on every edge
    pub game: GameSpec,
    /// Update rule applied once per tick
    pub rule: UpdateRule,
    /// Selection intensity `w` (DB/BD) or `beta` (imitation)
    pub intensity: f64,
    /// Probability that an inherited or imitated strategy flips
    pub mutation_rate: f64,
    /// Fraction of nodes that start as cooperators
    pub initial_cooperators: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            game: GameSpec::default(),
            rule: UpdateRule::DeathBirth,
            intensity: 0.1,
            mutation_rate: 0.0,
            initial_cooperators: 0.5,
        }
    }
}

impl DynamicsConfig {
    pub fn new(game: GameSpec, rule: UpdateRule) -> Self {
        Self {
            game,
            rule,
            ..Default::default()
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    pub fn with_initial_cooperators(mut self, fraction: f64) -> Self {
        self.initial_cooperators = fraction;
        self
    }

    /// Reject out-of-range parameters
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.intensity >= 0.0 && self.intensity.is_finite()) {
            return Err(ParamError::InvalidIntensity(self.intensity));
        }
        ParamError::check_unit("mutation rate", self.mutation_rate)?;
        ParamError::check_unit("initial cooperator fraction", self.initial_cooperators)?;
        Ok(())
    }

    /// Resolved parameters consumed by the update rules
    pub fn selection_params(&self) -> SelectionParams {
        SelectionParams {
            matrix: self.game.matrix(),
            intensity: self.intensity,
            mutation_rate: self.mutation_rate,
        }
    }
}

/// Per-run constants every update rule reads
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionParams {
    pub matrix: GameMatrix,
    pub intensity: f64,
    pub mutation_rate: f64,
}

impl SelectionParams {
    /// Same parameters with mutation switched off
    pub fn without_mutation(self) -> Self {
        Self {
            mutation_rate: 0.0,
            ..self
        }
    }
}
