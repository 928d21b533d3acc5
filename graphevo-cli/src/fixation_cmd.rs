//! Fixation command - estimate single-mutant fixation probabilities
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_estimator(), build_report()
//! - Level 3: print_text_results(), progress_bar()
//! - Level 4: command arguments

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use graphevo_core::Graph;
use graphevo_fixation::{CancelToken, FixationConfig, FixationEstimator, FixationResult, TrialOutcome};

use crate::args::{GameArgs, GraphArgs};
use crate::config::{self, SimConfig};
use crate::GlobalOpts;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct FixationArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub game: GameArgs,

    /// Number of trials (alternating cooperator and defector invasions)
    #[arg(long, default_value = "1000")]
    pub trials: usize,

    /// Update budget per trial before it counts as a timeout
    #[arg(long, default_value = "100000")]
    pub max_steps: u64,

    /// Run trials on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Stop starting new trials after this many seconds
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl FixationArgs {
    fn fixation_config(&self) -> FixationConfig {
        let config = FixationConfig::new(self.trials, self.max_steps);
        if self.sequential {
            config.sequential()
        } else {
            config
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FixationReport<'a> {
    pub timestamp: DateTime<Utc>,
    pub config: &'a SimConfig,
    pub cooperator_fixation_probability: f64,
    pub defector_fixation_probability: f64,
    pub neutral_baseline: f64,
    pub timeout_fraction: f64,
    pub result: &'a FixationResult,
    pub elapsed_secs: f64,
}

// ============================================================================
// LEVEL 1: ORCHESTRATION
// ============================================================================

pub fn run(args: FixationArgs, global: &GlobalOpts) -> Result<()> {
    let config = config::resolve(global, |seed| {
        SimConfig::new(args.graph.to_config(seed), args.game.to_config())
            .with_fixation(args.fixation_config())
    })?;
    let fixation = match &config.fixation {
        Some(fixation) => fixation.clone(),
        None => args.fixation_config().with_seed(config.session_seed()),
    };

    let graph = config
        .graph
        .build()
        .context("Failed to generate graph")?;

    tracing::info!(
        topology = config.graph.topology.name(),
        nodes = graph.len(),
        rule = config.dynamics.rule.name(),
        trials = fixation.trials,
        parallel = fixation.parallel,
        "Starting fixation estimate"
    );

    let start = Instant::now();
    let result = run_estimator(&graph, &config, fixation, args.time_limit, !args.json)?;
    let elapsed = start.elapsed();

    tracing::info!(
        completed = result.trials_completed,
        skipped = result.trials_skipped(),
        "Fixation estimate finished in {:.2}s",
        elapsed.as_secs_f64()
    );

    if args.json {
        let report = build_report(&config, &result, elapsed);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_results(&config, &result, elapsed);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2: PHASES
// ============================================================================

fn run_estimator(
    graph: &Graph,
    config: &SimConfig,
    fixation: FixationConfig,
    time_limit: Option<u64>,
    show_progress: bool,
) -> Result<FixationResult> {
    let trials = fixation.trials;
    let token = CancelToken::new();

    if let Some(secs) = time_limit {
        let timer = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            tracing::warn!("Time limit of {}s reached, finishing running trials", secs);
            timer.cancel();
        });
    }

    let bar = if show_progress {
        progress_bar(trials)?
    } else {
        ProgressBar::hidden()
    };
    let callback_bar = bar.clone();

    let estimator = FixationEstimator::new(graph, &config.dynamics, fixation)
        .context("Invalid fixation parameters")?
        .cancel_token(token)
        .progress(move |completed, _total| callback_bar.set_position(completed as u64));

    let result = estimator.run();
    bar.finish_and_clear();

    Ok(result)
}

fn build_report<'a>(
    config: &'a SimConfig,
    result: &'a FixationResult,
    elapsed: Duration,
) -> FixationReport<'a> {
    FixationReport {
        timestamp: Utc::now(),
        config,
        cooperator_fixation_probability: result.cooperator_fixation_probability(),
        defector_fixation_probability: result.defector_fixation_probability(),
        neutral_baseline: result.neutral_baseline(),
        timeout_fraction: result.probability(TrialOutcome::Timeout),
        result,
        elapsed_secs: elapsed.as_secs_f64(),
    }
}

// ============================================================================
// LEVEL 3: FORMATTING
// ============================================================================

fn progress_bar(trials: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(trials as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} trials ({eta})")
            .context("Invalid progress template")?,
    );
    Ok(bar)
}

fn print_text_results(config: &SimConfig, result: &FixationResult, elapsed: Duration) {
    println!();
    println!("=== Fixation Results ===");
    println!(
        "Graph:      {} (N = {})",
        config.graph.topology.name(),
        result.nodes
    );
    println!(
        "Rule:       {} (intensity {}, game {:?})",
        result.rule.name(),
        config.dynamics.intensity,
        config.dynamics.game.matrix()
    );
    println!(
        "Trials:     {} / {}",
        result.trials_completed, result.trials_requested
    );
    if result.trials_skipped() > 0 {
        println!("Skipped:    {} (cancelled)", result.trials_skipped());
    }
    println!();
    println!("{:<22} {:>8} {:>8} {:>8} {:>8}", "Scenario", "All C", "All D", "Timeout", "P(fix)");
    println!("{}", "-".repeat(58));
    println!(
        "{:<22} {:>8} {:>8} {:>8} {:>8.4}",
        "cooperator invades",
        result.cooperator_invasion.all_cooperate,
        result.cooperator_invasion.all_defect,
        result.cooperator_invasion.timeout,
        result.cooperator_fixation_probability()
    );
    println!(
        "{:<22} {:>8} {:>8} {:>8} {:>8.4}",
        "defector invades",
        result.defector_invasion.all_cooperate,
        result.defector_invasion.all_defect,
        result.defector_invasion.timeout,
        result.defector_fixation_probability()
    );
    println!();
    println!("Neutral baseline (1/N):  {:.4}", result.neutral_baseline());
    println!("Mean absorption steps:   {:.1}", result.avg_absorption_steps);
    println!("Time:                    {:.2}s", elapsed.as_secs_f64());
}

// ============================================================================
// TESTS
// ============================================================================
