//! Trial runner - executes a single fixation trial
//!
//! Level 3 - Step-level implementation

use graphevo_core::{is_fixated, Graph, SimRng, Strategy};
use graphevo_dynamics::{SelectionParams, UpdateRule};
use serde::{Deserialize, Serialize};

/// Initial condition of a trial
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// One cooperator in a population of defectors
    CooperatorInvades,
    /// One defector in a population of cooperators
    DefectorInvades,
}

impl Scenario {
    /// Even trials seed a cooperator, odd trials a defector
    pub fn for_trial(index: usize) -> Self {
        if index % 2 == 0 {
            Scenario::CooperatorInvades
        } else {
            Scenario::DefectorInvades
        }
    }

    pub fn mutant(&self) -> Strategy {
        match self {
            Scenario::CooperatorInvades => Strategy::Cooperate,
            Scenario::DefectorInvades => Strategy::Defect,
        }
    }

    pub fn resident(&self) -> Strategy {
        self.mutant().flipped()
    }
}

/// How a trial ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrialOutcome {
    AllCooperate,
    AllDefect,
    Timeout,
}

impl TrialOutcome {
    fn from_population(strategies: &[Strategy]) -> Self {
        if !is_fixated(strategies) {
            return TrialOutcome::Timeout;
        }
        match strategies.first() {
            Some(Strategy::Cooperate) => TrialOutcome::AllCooperate,
            Some(Strategy::Defect) | None => TrialOutcome::AllDefect,
        }
    }
}

/// Result of one trial
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialResult {
    pub index: usize,
    pub scenario: Scenario,
    pub outcome: TrialOutcome,
    /// Updates executed before absorption (or the full budget on timeout)
    pub steps: u64,
}

/// Run one trial from a single random mutant until fixation or `max_steps`.
///
/// `params` is used as given; callers wanting absorbing dynamics must pass
/// zero mutation. `graph` must have at least one node. The trial owns `rng`.
pub fn run_trial(
    graph: &Graph,
    rule: UpdateRule,
    params: &SelectionParams,
    index: usize,
    max_steps: u64,
    mut rng: SimRng,
) -> TrialResult {
    let scenario = Scenario::for_trial(index);

    let mut strategies = vec![scenario.resident(); graph.len()];
    let mutant = rng.int(graph.len());
    strategies[mutant] = scenario.mutant();

    let mut steps = 0;
    while steps < max_steps && !is_fixated(&strategies) {
        rule.step(graph, &mut strategies, params, &mut rng);
        steps += 1;
    }

    let outcome = TrialOutcome::from_population(&strategies);

    tracing::trace!(
        trial = index,
        ?scenario,
        ?outcome,
        steps,
        "Trial finished"
    );

    TrialResult {
        index,
        scenario,
        outcome,
        steps,
    }
}
