//! Simulate command - run the update loop on one population
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_session()
//! - Level 3: print_summary()
//! - Level 4: command arguments

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use graphevo_dynamics::{SessionSnapshot, SimulationSession};

use crate::args::{GameArgs, GraphArgs};
use crate::config::{self, SimConfig};
use crate::GlobalOpts;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(flatten)]
    pub game: GameArgs,

    /// Number of ticks to run
    #[arg(long, default_value = "10000")]
    pub steps: u64,

    /// Log the cooperator fraction every N ticks
    #[arg(long, default_value = "1000")]
    pub report_every: u64,

    /// Stop early once one strategy has taken over
    #[arg(long)]
    pub until_fixation: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Cooperator level at one reporting point
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub tick: u64,
    pub cooperators: usize,
    pub cooperator_fraction: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport<'a> {
    pub config: &'a SimConfig,
    pub replacements: u64,
    pub history: Vec<HistoryPoint>,
    #[serde(rename = "final")]
    pub final_state: SessionSnapshot,
    pub elapsed_secs: f64,
}

// ============================================================================
// LEVEL 1: ORCHESTRATION
// ============================================================================

pub fn run(args: SimulateArgs, global: &GlobalOpts) -> Result<()> {
    let config = config::resolve(global, |seed| {
        SimConfig::new(args.graph.to_config(seed), args.game.to_config())
    })?;

    let graph = config
        .graph
        .build()
        .context("Failed to generate graph")?;
    let mut session = SimulationSession::new(graph, &config.dynamics, config.session_seed())
        .context("Invalid dynamics parameters")?;

    tracing::info!(
        topology = config.graph.topology.name(),
        nodes = session.graph().len(),
        rule = session.rule().name(),
        steps = args.steps,
        "Starting simulation"
    );

    let start = Instant::now();
    let (replacements, history) =
        run_session(&mut session, args.steps, args.report_every, args.until_fixation);
    let elapsed = start.elapsed();

    if args.json {
        let report = SimulationReport {
            config: &config,
            replacements,
            history,
            final_state: session.snapshot(),
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&session, replacements, elapsed);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2: PHASES
// ============================================================================

/// Advance `session` by up to `steps` ticks, recording a history point at
/// the start, every `report_every` ticks and at the end.
///
/// Returns the number of ticks that replaced a strategy.
fn run_session(
    session: &mut SimulationSession,
    steps: u64,
    report_every: u64,
    until_fixation: bool,
) -> (u64, Vec<HistoryPoint>) {
    let chunk_size = report_every.max(1);
    let mut history = vec![history_point(session)];
    let mut replacements = 0;

    while session.tick() < steps {
        if until_fixation && session.is_fixated() {
            break;
        }

        let chunk = chunk_size.min(steps - session.tick());
        let target = session.tick() + chunk;
        while session.tick() < target {
            if until_fixation && session.is_fixated() {
                break;
            }
            if session.step().is_replacement() {
                replacements += 1;
            }
        }

        let point = history_point(session);
        tracing::info!(
            tick = point.tick,
            cooperators = point.cooperators,
            "Cooperator fraction {:.3}",
            point.cooperator_fraction
        );
        history.push(point);
    }

    if until_fixation {
        if let Some(strategy) = session.fixated_strategy() {
            tracing::info!(tick = session.tick(), ?strategy, "Population fixated");
        }
    }

    (replacements, history)
}

fn history_point(session: &SimulationSession) -> HistoryPoint {
    HistoryPoint {
        tick: session.tick(),
        cooperators: session.cooperator_count(),
        cooperator_fraction: session.cooperator_fraction(),
    }
}

// ============================================================================
// LEVEL 3: FORMATTING
// ============================================================================

fn print_summary(session: &SimulationSession, replacements: u64, elapsed: Duration) {
    println!();
    println!("=== Simulation Complete ===");
    println!("Ticks:        {}", session.tick());
    println!("Replacements: {}", replacements);
    println!(
        "Cooperators:  {} / {} ({:.1}%)",
        session.cooperator_count(),
        session.graph().len(),
        session.cooperator_fraction() * 100.0
    );
    match session.fixated_strategy() {
        Some(strategy) => println!("Fixated:      {:?}", strategy),
        None => println!("Fixated:      no"),
    }
    println!("Time:         {:.2}s", elapsed.as_secs_f64());
}

// ============================================================================
// TESTS
// ============================================================================
