//! Fixation estimation - batches of independent trials
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use graphevo_core::{Graph, ParamError, SimRng};
use graphevo_dynamics::{DynamicsConfig, SelectionParams, UpdateRule};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::config::FixationConfig;
use crate::trial::{run_trial, Scenario, TrialOutcome, TrialResult};

/// Tally of trial outcomes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub all_cooperate: usize,
    pub all_defect: usize,
    pub timeout: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::AllCooperate => self.all_cooperate += 1,
            TrialOutcome::AllDefect => self.all_defect += 1,
            TrialOutcome::Timeout => self.timeout += 1,
        }
    }

    /// Combine two tallies
    pub fn combine(&self, other: &OutcomeCounts) -> OutcomeCounts {
        OutcomeCounts {
            all_cooperate: self.all_cooperate + other.all_cooperate,
            all_defect: self.all_defect + other.all_defect,
            timeout: self.timeout + other.timeout,
        }
    }

    pub fn total(&self) -> usize {
        self.all_cooperate + self.all_defect + self.timeout
    }

    pub fn count(&self, outcome: TrialOutcome) -> usize {
        match outcome {
            TrialOutcome::AllCooperate => self.all_cooperate,
            TrialOutcome::AllDefect => self.all_defect,
            TrialOutcome::Timeout => self.timeout,
        }
    }

    /// Empirical probability of `outcome` (0.0 when nothing was recorded)
    pub fn probability(&self, outcome: TrialOutcome) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(outcome) as f64 / total as f64
        }
    }
}

/// Result of a fixation batch
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FixationResult {
    /// Population size
    pub nodes: usize,
    /// Update rule used
    pub rule: UpdateRule,
    /// Outcomes over all completed trials
    pub counts: OutcomeCounts,
    /// Outcomes of trials started from a single cooperator
    pub cooperator_invasion: OutcomeCounts,
    /// Outcomes of trials started from a single defector
    pub defector_invasion: OutcomeCounts,
    /// Trials requested by the configuration
    pub trials_requested: usize,
    /// Trials that ran to absorption or timeout
    pub trials_completed: usize,
    /// Mean updates to absorption over trials that fixated
    pub avg_absorption_steps: f64,
}

impl FixationResult {
    /// Trials not run because the batch was cancelled
    pub fn trials_skipped(&self) -> usize {
        self.trials_requested - self.trials_completed
    }

    pub fn probability(&self, outcome: TrialOutcome) -> f64 {
        self.counts.probability(outcome)
    }

    /// Fraction of cooperator-invasion trials ending in all-cooperate
    pub fn cooperator_fixation_probability(&self) -> f64 {
        self.cooperator_invasion.probability(TrialOutcome::AllCooperate)
    }

    /// Fraction of defector-invasion trials ending in all-defect
    pub fn defector_fixation_probability(&self) -> f64 {
        self.defector_invasion.probability(TrialOutcome::AllDefect)
    }

    /// Fixation probability of a single neutral mutant (1/N)
    pub fn neutral_baseline(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            1.0 / self.nodes as f64
        }
    }
}

type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Builder-style runner for a fixation batch.
///
/// Mutation is always switched off: fixation needs absorbing dynamics.
pub struct FixationEstimator<'g> {
    graph: &'g Graph,
    rule: UpdateRule,
    params: SelectionParams,
    config: FixationConfig,
    /// Never drawn from; each trial derives its own stream
    root: SimRng,
    cancel: Option<CancelToken>,
    progress: Option<ProgressCallback>,
}

impl<'g> FixationEstimator<'g> {
    pub fn new(
        graph: &'g Graph,
        dynamics: &DynamicsConfig,
        config: FixationConfig,
    ) -> Result<Self, ParamError> {
        dynamics.validate()?;
        if graph.is_empty() {
            return Err(ParamError::TooFewNodes {
                topology: "population",
                required: 1,
                nodes: 0,
            });
        }

        if dynamics.mutation_rate > 0.0 {
            tracing::debug!(
                mutation_rate = dynamics.mutation_rate,
                "Ignoring mutation rate for fixation trials"
            );
        }

        Ok(Self {
            graph,
            rule: dynamics.rule,
            params: dynamics.selection_params().without_mutation(),
            root: SimRng::new(config.base_seed),
            config,
            cancel: None,
            progress: None,
        })
    }

    /// Stop starting new trials once `token` is cancelled
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Called with `(completed, total)` after each trial finishes
    pub fn progress<P>(mut self, callback: P) -> Self
    where
        P: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Run the batch (Level 1 orchestration)
    pub fn run(&self) -> FixationResult {
        tracing::debug!(
            trials = self.config.trials,
            max_steps = self.config.max_steps,
            rule = self.rule.name(),
            parallel = self.config.parallel,
            "Starting fixation batch"
        );

        let results = self.execute_trials();
        let result = aggregate_results(self.graph.len(), self.rule, self.config.trials, &results);

        if result.counts.timeout > 0 {
            tracing::warn!(
                "{} of {} trials hit the {}-step budget without fixating",
                result.counts.timeout,
                result.trials_completed,
                self.config.max_steps
            );
        }

        result
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Run every trial, in parallel or sequentially, preserving trial order
    fn execute_trials(&self) -> Vec<Option<TrialResult>> {
        let completed = AtomicUsize::new(0);
        let run_one = |index: usize| self.run_one(index, &completed);

        if self.config.parallel {
            (0..self.config.trials).into_par_iter().map(run_one).collect()
        } else {
            (0..self.config.trials).map(run_one).collect()
        }
    }

    /// Run trial `index` unless the batch has been cancelled
    fn run_one(&self, index: usize, completed: &AtomicUsize) -> Option<TrialResult> {
        if self.cancel.as_ref().map_or(false, CancelToken::is_cancelled) {
            return None;
        }

        let result = run_trial(
            self.graph,
            self.rule,
            &self.params,
            index,
            self.config.max_steps,
            self.root.derive(index as u64),
        );

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref callback) = self.progress {
            callback(done, self.config.trials);
        }

        Some(result)
    }
}

/// Run a fixation batch without cancellation or progress reporting
pub fn estimate_fixation(
    graph: &Graph,
    dynamics: &DynamicsConfig,
    config: &FixationConfig,
) -> Result<FixationResult, ParamError> {
    Ok(FixationEstimator::new(graph, dynamics, config.clone())?.run())
}

/// Fold trial results into counters (order-independent)
fn aggregate_results(
    nodes: usize,
    rule: UpdateRule,
    trials_requested: usize,
    results: &[Option<TrialResult>],
) -> FixationResult {
    let mut cooperator_invasion = OutcomeCounts::default();
    let mut defector_invasion = OutcomeCounts::default();
    let mut absorption_steps = 0u64;
    let mut absorbed = 0u64;

    for result in results.iter().flatten() {
        match result.scenario {
            Scenario::CooperatorInvades => cooperator_invasion.record(result.outcome),
            Scenario::DefectorInvades => defector_invasion.record(result.outcome),
        }
        if result.outcome != TrialOutcome::Timeout {
            absorption_steps += result.steps;
            absorbed += 1;
        }
    }

    let counts = cooperator_invasion.combine(&defector_invasion);
    let avg_absorption_steps = if absorbed > 0 {
        absorption_steps as f64 / absorbed as f64
    } else {
        0.0
    };

    FixationResult {
        nodes,
        rule,
        counts,
        cooperator_invasion,
        defector_invasion,
        trials_requested,
        trials_completed: counts.total(),
        avg_absorption_steps,
    }
}
