//! GRAPHEVO CLI - Command-line interface
//!
//! Commands:
//! - graph: Generate a topology and report its structure
//! - simulate: Run evolutionary dynamics tick by tick
//! - fixation: Estimate fixation probabilities from repeated trials

mod args;
mod config;
mod fixation_cmd;
mod graph_cmd;
mod simulate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphevo")]
#[command(about = "Evolutionary game dynamics on graphs")]
struct Cli {
    /// Random seed (drawn from entropy and logged when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Load parameters from a JSON config file (replaces the per-command flags)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the resolved parameters to a JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    save_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a graph and print its structure
    Graph(graph_cmd::GraphCmdArgs),
    /// Run the update loop and report cooperation over time
    Simulate(simulate::SimulateArgs),
    /// Estimate fixation probabilities of single mutants
    Fixation(fixation_cmd::FixationArgs),
}

/// Options shared by every command
pub struct GlobalOpts {
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let global = GlobalOpts {
        seed: cli.seed,
        config: cli.config,
        save_config: cli.save_config,
    };

    match cli.command {
        Commands::Graph(args) => graph_cmd::run(args, &global),
        Commands::Simulate(args) => simulate::run(args, &global),
        Commands::Fixation(args) => fixation_cmd::run(args, &global),
    }
}

/// Initialize tracing; RUST_LOG overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
