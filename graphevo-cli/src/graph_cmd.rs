//! Graph command - generate a topology and describe it
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: describe_graph()
//! - Level 3: print_text_report()
//! - Level 4: command arguments

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use graphevo_core::{DegreeStats, Graph};
use graphevo_dynamics::DynamicsConfig;

use crate::args::GraphArgs;
use crate::config::{self, SimConfig};
use crate::GlobalOpts;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GraphCmdArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Include the edge list in the output
    #[arg(long)]
    pub edges: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Structural summary of a generated graph
#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub topology: &'static str,
    pub seed: u64,
    pub nodes: usize,
    pub edge_count: usize,
    pub degree: DegreeStats,
    pub isolated_nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<(usize, usize)>>,
}

// ============================================================================
// LEVEL 1: ORCHESTRATION
// ============================================================================

pub fn run(args: GraphCmdArgs, global: &GlobalOpts) -> Result<()> {
    let config = config::resolve(global, |seed| {
        SimConfig::new(args.graph.to_config(seed), DynamicsConfig::default())
    })?;

    let graph = config
        .graph
        .build()
        .context("Failed to generate graph")?;

    tracing::info!(
        topology = config.graph.topology.name(),
        nodes = graph.len(),
        edges = graph.edge_count(),
        "Generated graph"
    );

    let report = describe_graph(&graph, &config, args.edges);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2: PHASES
// ============================================================================

fn describe_graph(graph: &Graph, config: &SimConfig, with_edges: bool) -> GraphReport {
    let isolated_nodes = (0..graph.len()).filter(|&node| graph.degree(node) == 0).count();

    GraphReport {
        topology: config.graph.topology.name(),
        seed: config.graph.seed,
        nodes: graph.len(),
        edge_count: graph.edge_count(),
        degree: graph.degree_stats(),
        isolated_nodes,
        edges: with_edges.then(|| graph.edges()),
    }
}

// ============================================================================
// LEVEL 3: FORMATTING
// ============================================================================

fn print_text_report(report: &GraphReport) {
    println!();
    println!("=== Graph ===");
    println!("Topology:  {}", report.topology);
    println!("Seed:      {}", report.seed);
    println!("Nodes:     {}", report.nodes);
    println!("Edges:     {}", report.edge_count);
    println!(
        "Degree:    min {} / mean {:.2} / max {}",
        report.degree.min, report.degree.mean, report.degree.max
    );
    if report.isolated_nodes > 0 {
        println!("Isolated:  {}", report.isolated_nodes);
    }

    if let Some(edges) = &report.edges {
        println!();
        for (u, v) in edges {
            println!("{} {}", u, v);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
