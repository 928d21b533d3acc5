//! Argument groups shared by the graph, simulate and fixation commands
//!
//! Level 4 - Configuration

use clap::{Args, ValueEnum};

use graphevo_core::{GameMatrix, GameSpec, GraphConfig, Topology};
use graphevo_dynamics::{DynamicsConfig, UpdateRule};

// ============================================================================
// GRAPH FLAGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopologyKind {
    /// Cycle where each node links to its k nearest neighbors
    Ring,
    /// Square torus with von Neumann neighborhoods
    Lattice,
    /// Independent edges with probability p
    ErdosRenyi,
    /// Preferential attachment grown from an m0-clique
    BarabasiAlbert,
}

#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Graph topology
    #[arg(long, value_enum, default_value = "ring")]
    pub topology: TopologyKind,

    /// Number of nodes (a perfect square for lattices)
    #[arg(short, long, default_value = "100")]
    pub nodes: usize,

    /// Ring degree (even)
    #[arg(long, default_value = "4")]
    pub k: usize,

    /// Erdos-Renyi edge probability
    #[arg(long, default_value = "0.05")]
    pub p: f64,

    /// Barabasi-Albert seed clique size
    #[arg(long, default_value = "5")]
    pub m0: usize,

    /// Barabasi-Albert edges per new node
    #[arg(long, default_value = "2")]
    pub m: usize,
}

impl GraphArgs {
    pub fn topology(&self) -> Topology {
        match self.topology {
            TopologyKind::Ring => Topology::Ring { k: self.k },
            TopologyKind::Lattice => Topology::Lattice,
            TopologyKind::ErdosRenyi => Topology::ErdosRenyi { p: self.p },
            TopologyKind::BarabasiAlbert => Topology::BarabasiAlbert {
                m0: self.m0,
                m: self.m,
            },
        }
    }

    pub fn to_config(&self, seed: u64) -> GraphConfig {
        GraphConfig::new(self.topology(), self.nodes).with_seed(seed)
    }
}

// ============================================================================
// GAME FLAGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleKind {
    /// Death-birth: a random node dies, neighbors compete for the slot
    Db,
    /// Birth-death: a fitness-chosen node reproduces onto a neighbor
    Bd,
    /// Pairwise comparison with the Fermi function
    Imitation,
}

impl From<RuleKind> for UpdateRule {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Db => UpdateRule::DeathBirth,
            RuleKind::Bd => UpdateRule::BirthDeath,
            RuleKind::Imitation => UpdateRule::Imitation,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Update rule
    #[arg(long, value_enum, default_value = "db")]
    pub rule: RuleKind,

    /// Donation game benefit
    #[arg(long, default_value = "3.0")]
    pub b: f64,

    /// Donation game cost
    #[arg(long, default_value = "1.0")]
    pub c: f64,

    /// Explicit payoff matrix, overrides --b/--c
    #[arg(long, value_name = "R,S,T,P", value_parser = parse_matrix, conflicts_with_all = ["b", "c"])]
    pub matrix: Option<GameMatrix>,

    /// Selection intensity w (0 = neutral drift)
    #[arg(long, default_value = "0.1")]
    pub intensity: f64,

    /// Mutation rate applied on each strategy adoption
    #[arg(long, default_value = "0.0")]
    pub mu: f64,

    /// Initial fraction of cooperators
    #[arg(long, default_value = "0.5")]
    pub cooperators: f64,
}

impl GameArgs {
    pub fn game(&self) -> GameSpec {
        match self.matrix {
            Some(matrix) => GameSpec::Matrix(matrix),
            None => GameSpec::Donation {
                b: self.b,
                c: self.c,
            },
        }
    }

    pub fn to_config(&self) -> DynamicsConfig {
        DynamicsConfig::new(self.game(), self.rule.into())
            .with_intensity(self.intensity)
            .with_mutation_rate(self.mu)
            .with_initial_cooperators(self.cooperators)
    }
}

/// Parse "R,S,T,P" into a payoff matrix
pub fn parse_matrix(s: &str) -> Result<GameMatrix, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid payoff '{}': {}", part.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [r, s, t, p] => Ok(GameMatrix::new(*r, *s, *t, *p)),
        _ => Err(format!("expected 4 payoffs R,S,T,P, got {}", values.len())),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_args(topology: TopologyKind) -> GraphArgs {
        GraphArgs {
            topology,
            nodes: 25,
            k: 4,
            p: 0.2,
            m0: 4,
            m: 2,
        }
    }

    #[test]
    fn test_parse_matrix() {
        let matrix = parse_matrix("3, 0,5,1").unwrap();
        assert_eq!(matrix, GameMatrix::new(3.0, 0.0, 5.0, 1.0));
    }

    #[test]
    fn test_parse_matrix_rejects_bad_input() {
        assert!(parse_matrix("1,2,3").is_err());
        assert!(parse_matrix("1,2,3,4,5").is_err());
        assert!(parse_matrix("1,x,3,4").is_err());
    }

    #[test]
    fn test_topology_mapping() {
        assert_eq!(graph_args(TopologyKind::Ring).topology(), Topology::Ring { k: 4 });
        assert_eq!(graph_args(TopologyKind::Lattice).topology(), Topology::Lattice);
        assert_eq!(
            graph_args(TopologyKind::ErdosRenyi).topology(),
            Topology::ErdosRenyi { p: 0.2 }
        );
        assert_eq!(
            graph_args(TopologyKind::BarabasiAlbert).topology(),
            Topology::BarabasiAlbert { m0: 4, m: 2 }
        );
    }

    #[test]
    fn test_graph_config_carries_seed() {
        let config = graph_args(TopologyKind::Lattice).to_config(9);
        assert_eq!(config.nodes, 25);
        assert_eq!(config.seed, 9);
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_game_prefers_matrix() {
        let mut args = GameArgs {
            rule: RuleKind::Bd,
            b: 4.0,
            c: 1.0,
            matrix: None,
            intensity: 0.5,
            mu: 0.01,
            cooperators: 0.3,
        };
        assert_eq!(args.game(), GameSpec::Donation { b: 4.0, c: 1.0 });

        args.matrix = Some(GameMatrix::new(1.0, 0.0, 0.0, 0.0));
        let config = args.to_config();
        assert_eq!(config.game, GameSpec::Matrix(GameMatrix::new(1.0, 0.0, 0.0, 0.0)));
        assert_eq!(config.rule, UpdateRule::BirthDeath);
        assert_eq!(config.intensity, 0.5);
        assert_eq!(config.mutation_rate, 0.01);
        assert_eq!(config.initial_cooperators, 0.3);
    }
}
