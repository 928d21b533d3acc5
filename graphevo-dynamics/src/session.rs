//! Simulation session - caller-owned population state
//!
//! A session bundles everything one interactive run needs: the graph, the
//! strategy assignment, the resolved parameters, its own random stream and
//! a tick counter. Callers drive it one tick at a time and may stop between
//! any two ticks.

use graphevo_core::{cooperator_count, is_fixated, to_bits, Graph, ParamError, SimRng, Strategy};
use serde::Serialize;

use crate::config::{DynamicsConfig, SelectionParams};
use crate::rules::{StepOutcome, UpdateRule};

/// Interactive simulation state
#[derive(Clone, Debug)]
pub struct SimulationSession {
    graph: Graph,
    strategies: Vec<Strategy>,
    rule: UpdateRule,
    params: SelectionParams,
    rng: SimRng,
    tick: u64,
}

/// Read-only view handed to presentation code
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub nodes: usize,
    pub cooperators: usize,
    pub cooperator_fraction: f64,
    pub fixated: bool,
    pub strategies: Vec<u8>,
}

impl SimulationSession {
    /// Start a session with a random initial population.
    ///
    /// Exactly `round(initial_cooperators * N)` nodes start as cooperators.
    pub fn new(graph: Graph, config: &DynamicsConfig, seed: u64) -> Result<Self, ParamError> {
        config.validate()?;
        check_population(&graph)?;

        let mut rng = SimRng::new(seed);
        let strategies = random_population(graph.len(), config.initial_cooperators, &mut rng);

        tracing::debug!(
            nodes = graph.len(),
            rule = config.rule.name(),
            cooperators = cooperator_count(&strategies),
            "Session initialized"
        );

        Ok(Self {
            graph,
            strategies,
            rule: config.rule,
            params: config.selection_params(),
            rng,
            tick: 0,
        })
    }

    /// Start a session from an explicit strategy assignment
    pub fn with_strategies(
        graph: Graph,
        strategies: Vec<Strategy>,
        config: &DynamicsConfig,
        seed: u64,
    ) -> Result<Self, ParamError> {
        config.validate()?;
        check_population(&graph)?;
        if strategies.len() != graph.len() {
            return Err(ParamError::PopulationSizeMismatch {
                expected: graph.len(),
                got: strategies.len(),
            });
        }

        Ok(Self {
            graph,
            strategies,
            rule: config.rule,
            params: config.selection_params(),
            rng: SimRng::new(seed),
            tick: 0,
        })
    }

    /// Advance one tick
    pub fn step(&mut self) -> StepOutcome {
        let outcome = self
            .rule
            .step(&self.graph, &mut self.strategies, &self.params, &mut self.rng);
        self.tick += 1;
        outcome
    }

    /// Advance `ticks` ticks, returning how many replaced a node
    pub fn run(&mut self, ticks: u64) -> u64 {
        let mut replacements = 0;
        for _ in 0..ticks {
            if self.step().is_replacement() {
                replacements += 1;
            }
        }
        replacements
    }

    /// Advance until the population is monomorphic or `max_ticks` elapse.
    ///
    /// Returns the fixated strategy, if any. Only meaningful without mutation,
    /// since mutation can leave a fixated state again.
    pub fn run_until_fixated(&mut self, max_ticks: u64) -> Option<Strategy> {
        for _ in 0..max_ticks {
            if self.is_fixated() {
                break;
            }
            self.step();
        }
        self.fixated_strategy()
    }

    /// Re-draw the initial population and reset the tick counter.
    ///
    /// The random stream continues, so consecutive resets differ.
    pub fn reset(&mut self, initial_cooperators: f64) -> Result<(), ParamError> {
        ParamError::check_unit("initial cooperator fraction", initial_cooperators)?;
        self.strategies = random_population(self.graph.len(), initial_cooperators, &mut self.rng);
        self.tick = 0;
        Ok(())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    pub fn cooperator_count(&self) -> usize {
        cooperator_count(&self.strategies)
    }

    pub fn cooperator_fraction(&self) -> f64 {
        self.cooperator_count() as f64 / self.strategies.len() as f64
    }

    pub fn is_fixated(&self) -> bool {
        is_fixated(&self.strategies)
    }

    /// Strategy everyone plays, if the population is monomorphic
    pub fn fixated_strategy(&self) -> Option<Strategy> {
        if self.is_fixated() {
            self.strategies.first().copied()
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.tick,
            nodes: self.strategies.len(),
            cooperators: self.cooperator_count(),
            cooperator_fraction: self.cooperator_fraction(),
            fixated: self.is_fixated(),
            strategies: to_bits(&self.strategies),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn check_population(graph: &Graph) -> Result<(), ParamError> {
    if graph.is_empty() {
        return Err(ParamError::TooFewNodes {
            topology: "population",
            required: 1,
            nodes: 0,
        });
    }
    Ok(())
}

/// Population with exactly `round(fraction * n)` cooperators at random nodes
fn random_population(n: usize, fraction: f64, rng: &mut SimRng) -> Vec<Strategy> {
    let cooperators = ((fraction * n as f64).round() as usize).min(n);

    // Partial Fisher-Yates: the first `cooperators` slots become a uniform sample
    let mut order: Vec<usize> = (0..n).collect();
    for i in 0..cooperators {
        let j = i + rng.int(n - i);
        order.swap(i, j);
    }

    let mut strategies = vec![Strategy::Defect; n];
    for &node in &order[..cooperators] {
        strategies[node] = Strategy::Cooperate;
    }
    strategies
}
