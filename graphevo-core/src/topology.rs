//! Topology generators
//!
//! Every generator validates its parameters before touching a graph, so an
//! error never leaks a half-built value. Generators that need randomness
//! consume draws from the supplied [`SimRng`] in a fixed order, making the
//! resulting graph a pure function of `(n, params, seed)`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::graph::Graph;
use crate::rng::SimRng;

/// Graph family and its family-specific parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Topology {
    /// Cycle where each node links to its `k/2` nearest neighbors per side
    Ring { k: usize },
    /// Square torus with von Neumann neighborhoods
    Lattice,
    /// G(N, p) random graph
    ErdosRenyi { p: f64 },
    /// Preferential attachment from an `m0`-clique, `m` edges per new node
    BarabasiAlbert { m0: usize, m: usize },
}

impl Default for Topology {
    fn default() -> Self {
        Topology::Ring { k: 4 }
    }
}

impl Topology {
    /// Build a graph with `n` nodes
    pub fn build(&self, n: usize, rng: &mut SimRng) -> Result<Graph, ParamError> {
        let graph = match *self {
            Topology::Ring { k } => ring(n, k)?,
            Topology::Lattice => lattice(n)?,
            Topology::ErdosRenyi { p } => erdos_renyi(n, p, rng)?,
            Topology::BarabasiAlbert { m0, m } => barabasi_albert(n, m0, m, rng)?,
        };

        tracing::debug!(
            topology = self.name(),
            nodes = graph.len(),
            edges = graph.edge_count(),
            "Generated graph"
        );

        Ok(graph)
    }

    /// Short identifier used in logs and CLI flags
    pub fn name(&self) -> &'static str {
        match self {
            Topology::Ring { .. } => "ring",
            Topology::Lattice => "lattice",
            Topology::ErdosRenyi { .. } => "erdos-renyi",
            Topology::BarabasiAlbert { .. } => "barabasi-albert",
        }
    }
}

/// Everything needed to reproduce a graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub topology: Topology,
    pub nodes: usize,
    pub seed: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            nodes: 100,
            seed: 42,
        }
    }
}

impl GraphConfig {
    pub fn new(topology: Topology, nodes: usize) -> Self {
        Self {
            topology,
            nodes,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate the graph from a fresh stream seeded with `self.seed`
    pub fn build(&self) -> Result<Graph, ParamError> {
        let mut rng = SimRng::new(self.seed);
        self.topology.build(self.nodes, &mut rng)
    }
}

// ============================================================================
// Generators
// ============================================================================

/// k-regular ring lattice. `k` must be even, at least 2, and below `n`.
pub fn ring(n: usize, k: usize) -> Result<Graph, ParamError> {
    if k % 2 != 0 {
        return Err(ParamError::OddRingDegree(k));
    }
    if k < 2 {
        return Err(ParamError::RingDegreeTooSmall(k));
    }
    if n <= k {
        return Err(ParamError::TooFewNodes {
            topology: "ring",
            required: k + 1,
            nodes: n,
        });
    }

    let mut graph = Graph::with_nodes(n);
    for i in 0..n {
        for offset in 1..=k / 2 {
            graph.add_edge(i, (i + offset) % n);
        }
    }
    Ok(graph)
}

/// Periodic square lattice (torus). `n` must be a perfect square.
pub fn lattice(n: usize) -> Result<Graph, ParamError> {
    let side = (n as f64).sqrt().round() as usize;
    if side * side != n {
        return Err(ParamError::NotPerfectSquare(n));
    }

    let mut graph = Graph::with_nodes(n);
    let index = |row: usize, col: usize| row * side + col;
    for row in 0..side {
        for col in 0..side {
            let node = index(row, col);
            // Right and down neighbors cover all four directions once wrapped
            graph.add_edge(node, index(row, (col + 1) % side));
            graph.add_edge(node, index((row + 1) % side, col));
        }
    }
    Ok(graph)
}

/// G(n, p): one draw per unordered pair `(i, j)`, `i < j`
pub fn erdos_renyi(n: usize, p: f64, rng: &mut SimRng) -> Result<Graph, ParamError> {
    ParamError::check_unit("edge probability", p)?;

    let mut graph = Graph::with_nodes(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.random() < p {
                graph.add_edge(i, j);
            }
        }
    }
    Ok(graph)
}

/// Barabasi-Albert preferential attachment.
///
/// Starts from a clique on `m0` nodes. Every later node attaches to `m`
/// distinct targets drawn from a pool in which each node appears once per
/// unit of degree.
pub fn barabasi_albert(
    n: usize,
    m0: usize,
    m: usize,
    rng: &mut SimRng,
) -> Result<Graph, ParamError> {
    if m0 < 2 {
        return Err(ParamError::SeedCliqueTooSmall(m0));
    }
    if m < 1 || m >= m0 {
        return Err(ParamError::AttachmentOutOfRange { m, m0 });
    }
    if n < m0 {
        return Err(ParamError::TooFewNodes {
            topology: "barabasi-albert",
            required: m0,
            nodes: n,
        });
    }

    let mut graph = Graph::with_nodes(n);
    let mut pool: Vec<usize> = Vec::with_capacity(m0 * (m0 - 1) + 2 * m * (n - m0));

    for i in 0..m0 {
        for j in (i + 1)..m0 {
            graph.add_edge(i, j);
        }
    }
    for i in 0..m0 {
        pool.extend(std::iter::repeat(i).take(graph.degree(i)));
    }

    let mut chosen: Vec<usize> = Vec::with_capacity(m);
    let mut seen: FxHashSet<usize> = FxHashSet::default();

    for node in m0..n {
        chosen.clear();
        seen.clear();

        // The pool always holds at least m0 > m distinct nodes
        while chosen.len() < m {
            let target = *rng.pick(&pool);
            if seen.insert(target) {
                chosen.push(target);
            }
        }

        for &target in &chosen {
            graph.add_edge(node, target);
        }
        pool.extend(chosen.iter().copied());
        pool.extend(std::iter::repeat(node).take(graph.degree(node)));
    }

    Ok(graph)
}
