//! Evolutionary update rules
//!
//! Each call performs exactly one elementary demographic event and changes
//! at most one node. Payoffs are recomputed from the current strategies at
//! the start of every call.

use graphevo_core::{compute_payoffs, Graph, SimRng, Strategy};
use serde::{Deserialize, Serialize};

use crate::config::SelectionParams;
use crate::mutation::inherit;
use crate::selection::{fermi, fitness, weighted_index};

/// Which demographic event a tick performs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateRule {
    /// Random death, neighbors compete by fitness to fill the gap
    #[default]
    #[serde(rename = "db")]
    DeathBirth,
    /// Global fitness-weighted birth, offspring replaces a random neighbor
    #[serde(rename = "bd")]
    BirthDeath,
    /// Random focal node copies a random neighbor with Fermi probability
    #[serde(rename = "imitation")]
    Imitation,
}

/// What a single update did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// `node` took on `strategy`, copied (and possibly mutated) from `source`
    Replaced {
        node: usize,
        source: usize,
        strategy: Strategy,
    },
    /// Imitation was considered for `node` and declined
    Rejected { node: usize },
    /// The selected node had no neighbors; nothing happened
    Isolated { node: usize },
}

impl StepOutcome {
    /// Whether a node was overwritten (its strategy may be unchanged)
    pub fn is_replacement(&self) -> bool {
        matches!(self, StepOutcome::Replaced { .. })
    }
}

impl UpdateRule {
    pub const ALL: [UpdateRule; 3] = [
        UpdateRule::DeathBirth,
        UpdateRule::BirthDeath,
        UpdateRule::Imitation,
    ];

    /// Apply one update to `strategies` in place.
    ///
    /// `strategies` must be index-aligned with `graph` and non-empty.
    pub fn step(
        &self,
        graph: &Graph,
        strategies: &mut [Strategy],
        params: &SelectionParams,
        rng: &mut SimRng,
    ) -> StepOutcome {
        debug_assert_eq!(graph.len(), strategies.len());
        debug_assert!(!strategies.is_empty());

        match self {
            UpdateRule::DeathBirth => death_birth(graph, strategies, params, rng),
            UpdateRule::BirthDeath => birth_death(graph, strategies, params, rng),
            UpdateRule::Imitation => imitation(graph, strategies, params, rng),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::DeathBirth => "db",
            UpdateRule::BirthDeath => "bd",
            UpdateRule::Imitation => "imitation",
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

fn death_birth(
    graph: &Graph,
    strategies: &mut [Strategy],
    params: &SelectionParams,
    rng: &mut SimRng,
) -> StepOutcome {
    let payoffs = compute_payoffs(graph, strategies, &params.matrix);

    let dead = rng.int(strategies.len());
    let neighbors = graph.neighbors(dead);
    if neighbors.is_empty() {
        return StepOutcome::Isolated { node: dead };
    }

    let weights: Vec<f64> = neighbors
        .iter()
        .map(|&j| fitness(payoffs[j], params.intensity))
        .collect();
    let parent = neighbors[weighted_index(&weights, rng)];

    let strategy = inherit(strategies[parent], params.mutation_rate, rng);
    strategies[dead] = strategy;

    StepOutcome::Replaced {
        node: dead,
        source: parent,
        strategy,
    }
}

fn birth_death(
    graph: &Graph,
    strategies: &mut [Strategy],
    params: &SelectionParams,
    rng: &mut SimRng,
) -> StepOutcome {
    let payoffs = compute_payoffs(graph, strategies, &params.matrix);

    let weights: Vec<f64> = payoffs
        .iter()
        .map(|&p| fitness(p, params.intensity))
        .collect();
    let parent = weighted_index(&weights, rng);

    let neighbors = graph.neighbors(parent);
    if neighbors.is_empty() {
        return StepOutcome::Isolated { node: parent };
    }
    let victim = *rng.pick(neighbors);

    let strategy = inherit(strategies[parent], params.mutation_rate, rng);
    strategies[victim] = strategy;

    StepOutcome::Replaced {
        node: victim,
        source: parent,
        strategy,
    }
}

fn imitation(
    graph: &Graph,
    strategies: &mut [Strategy],
    params: &SelectionParams,
    rng: &mut SimRng,
) -> StepOutcome {
    let payoffs = compute_payoffs(graph, strategies, &params.matrix);

    let focal = rng.int(strategies.len());
    let neighbors = graph.neighbors(focal);
    if neighbors.is_empty() {
        return StepOutcome::Isolated { node: focal };
    }
    let model = *rng.pick(neighbors);

    let adopt = fermi(payoffs[model] - payoffs[focal], params.intensity);
    if !rng.chance(adopt) {
        return StepOutcome::Rejected { node: focal };
    }

    let strategy = inherit(strategies[model], params.mutation_rate, rng);
    strategies[focal] = strategy;

    StepOutcome::Replaced {
        node: focal,
        source: model,
        strategy,
    }
}
